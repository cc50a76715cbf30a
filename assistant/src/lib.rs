//! # assistant
//!
//! The conversation engine behind the shop bot. [`AssistantOrchestrator::reply`] turns one customer
//! message into one reply: current catalog → product retrieval → grounded user turn in memory →
//! system prompt from the current listing → completion call → assistant turn in memory.
//! [`handle_inbound`] connects it to a [`shopbot_core::Transport`].
//!
//! **External interactions:** catalog endpoint (via [`catalog::CatalogCache`]), completion service
//! (via [`llm_client::CompletionClient`]), messaging transport (via [`shopbot_core::Transport`]).

mod dispatch;
mod orchestrator;
mod user_locks;

pub use dispatch::{handle_inbound, handle_inbound_in_turn, DispatchOutcome};
pub use orchestrator::{AssistantOrchestrator, SERVICE_ERROR_REPLY, TRANSPORT_ERROR_REPLY};
pub use user_locks::{TurnSlot, UserLocks};

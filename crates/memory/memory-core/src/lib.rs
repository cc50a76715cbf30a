//! # memory-core
//!
//! Conversation memory for the assistant: [`ConversationTurn`] and the [`ConversationStore`] trait.
//! Implementations (e.g. memory-inmemory) keep, per user id, the most recent turns up to a fixed cap.

mod store;
mod types;

pub use store::{ConversationStore, DEFAULT_MAX_TURNS};
pub use types::{ConversationTurn, TurnRole};

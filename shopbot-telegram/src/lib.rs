//! # shopbot-telegram
//!
//! Telegram transport layer: [`TelegramTransport`] (implements [`shopbot_core::Transport`]),
//! conversion of teloxide messages to [`shopbot_core::InboundMessage`], minimal config, and the
//! long-polling runner that hands every update to [`assistant::handle_inbound`].
//! Handles only Telegram connectivity; catalog, memory and model logic live in `assistant`.

mod adapters;
mod config;
mod runner;
mod transport;

pub use adapters::{inbound_from_message, is_group_chat};
pub use config::TelegramConfig;
pub use runner::{connect, run_polling, RECONNECT_DELAY};
pub use transport::TelegramTransport;

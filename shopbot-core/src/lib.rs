//! # shopbot-core
//!
//! Core types shared by the assistant and its transports: [`Transport`], [`InboundMessage`],
//! [`ConnectionState`], error types and tracing initialization. Transport-agnostic; used by
//! assistant, shopbot-telegram and shopbot-cli.

pub mod error;
pub mod logger;
pub mod transport;
pub mod types;

pub use error::{BotError, Result};
pub use logger::init_tracing;
pub use transport::Transport;
pub use types::{ConnectionState, InboundMessage};

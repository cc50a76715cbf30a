//! Error types for the bot core.
//!
//! [`BotError`] covers transport failures at the edges of the system.
//! Catalog and completion failures have their own types in their crates and never reach here.

use thiserror::Error;

/// Top-level error for transport operations.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;

//! Core types: inbound message events and transport connection lifecycle.

use serde::{Deserialize, Serialize};

/// A text event delivered by a messaging transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Transport-specific sender id; also the key of the sender's conversation history.
    pub sender_id: String,
    pub text: String,
    /// Sent by the bot's own account.
    pub from_self: bool,
    /// Originated in a group (or channel) rather than a one-to-one chat.
    pub is_group: bool,
}

impl InboundMessage {
    /// A direct (one-to-one) text message from `sender_id`.
    pub fn direct(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            text: text.into(),
            from_self: false,
            is_group: false,
        }
    }

    /// True when the assistant should answer: not self-sent, not from a group, text not blank.
    pub fn should_answer(&self) -> bool {
        !self.from_self && !self.is_group && !self.text.trim().is_empty()
    }
}

/// Connection lifecycle of a messaging transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    Connecting,
    Open,
    /// Closed by a transient failure; a fresh connection attempt should follow.
    ClosedRecoverable,
    /// Closed for good (e.g. session logged out or token revoked).
    ClosedTerminal,
}

impl ConnectionState {
    /// Whether a new connection attempt should be started from this state.
    pub fn should_reconnect(self) -> bool {
        matches!(self, ConnectionState::ClosedRecoverable)
    }
}

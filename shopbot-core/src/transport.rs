//! Messaging transport abstraction.
//!
//! [`Transport`] is the capability the assistant needs from a messaging channel: send text and
//! signal typing. Connection handling and reconnection stay inside each implementation.

use crate::error::Result;
use async_trait::async_trait;

/// Outbound side of a messaging channel (e.g. Telegram, console).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Sends a text message to `recipient_id`.
    async fn send_text(&self, recipient_id: &str, text: &str) -> Result<()>;

    /// Shows a typing indicator to `recipient_id`. Best-effort; default is a no-op.
    async fn send_typing(&self, _recipient_id: &str) -> Result<()> {
        Ok(())
    }
}

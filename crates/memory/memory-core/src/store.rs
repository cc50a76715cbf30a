//! # Conversation storage
//!
//! [`ConversationStore`] keeps an ordered, bounded history per user id.
//!
//! - `append` pushes a turn and then drops the oldest turns beyond the cap, as one step.
//! - `history` returns the retained turns oldest first; an unseen user has an empty history.
//!
//! Histories are created on first append and live as long as the store. Nothing is persisted;
//! losing history on restart is normal operation.

use async_trait::async_trait;

use crate::types::ConversationTurn;

/// Turns kept per user unless configured otherwise.
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Per-user bounded conversation history.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Appends `turn` to `user_id`'s history, keeping only the newest `max_turns()` turns.
    async fn append(&self, user_id: &str, turn: ConversationTurn) -> Result<(), anyhow::Error>;

    /// The retained turns for `user_id`, oldest first.
    async fn history(&self, user_id: &str) -> Result<Vec<ConversationTurn>, anyhow::Error>;

    /// Cap on turns kept per user.
    fn max_turns(&self) -> usize;
}

//! In-memory implementation of [`ConversationStore`].

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use memory_core::{ConversationStore, ConversationTurn, DEFAULT_MAX_TURNS};
use tokio::sync::RwLock;
use tracing::debug;

type HistoryMap = HashMap<String, VecDeque<ConversationTurn>>;

/// Process-lifetime conversation store: a map of user id to a capped queue of turns.
#[derive(Debug, Clone)]
pub struct InMemoryConversationStore {
    histories: Arc<RwLock<HistoryMap>>,
    max_turns: usize,
}

impl InMemoryConversationStore {
    /// Store keeping the newest `max_turns` turns per user (at least one).
    pub fn new(max_turns: usize) -> Self {
        Self {
            histories: Arc::new(RwLock::new(HistoryMap::new())),
            max_turns: max_turns.max(1),
        }
    }

    /// Number of users with a history.
    pub async fn user_count(&self) -> usize {
        self.histories.read().await.len()
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS)
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append(&self, user_id: &str, turn: ConversationTurn) -> Result<(), anyhow::Error> {
        let mut histories = self.histories.write().await;
        let history = histories.entry(user_id.to_string()).or_default();
        history.push_back(turn);
        let mut evicted = 0;
        while history.len() > self.max_turns {
            history.pop_front();
            evicted += 1;
        }
        debug!(
            user_id = %user_id,
            turns = history.len(),
            evicted,
            "Conversation turn appended"
        );
        Ok(())
    }

    async fn history(&self, user_id: &str) -> Result<Vec<ConversationTurn>, anyhow::Error> {
        let histories = self.histories.read().await;
        Ok(histories
            .get(user_id)
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn max_turns(&self) -> usize {
        self.max_turns
    }
}

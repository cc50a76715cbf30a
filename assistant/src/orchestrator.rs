//! [`AssistantOrchestrator`]: one customer message in, one reply out.

use std::sync::Arc;

use catalog::{search, CatalogCache};
use llm_client::{CompletionClient, CompletionError};
use memory_core::{ConversationStore, ConversationTurn};
use memory_inmemory::InMemoryConversationStore;
use prompt::{ChatMessage, PromptComposer};
use tracing::{debug, error, info, instrument};

use crate::user_locks::{TurnSlot, UserLocks};

// --- User-facing fallback replies (never stored as assistant turns) ---
/// Sent when the completion service answered with an error object.
pub const SERVICE_ERROR_REPLY: &str =
    "Disculpá, hubo un error. Escribinos directamente para ayudarte 🙏";
/// Sent when the completion call failed, timed out or returned an unusable response.
pub const TRANSPORT_ERROR_REPLY: &str =
    "Disculpá, hubo un error técnico. Intentá de nuevo en un momento.";

/// Logs the exact messages submitted to the LLM (role + length; content at debug level).
fn log_messages_submitted_to_llm(messages: &[ChatMessage]) {
    info!(count = messages.len(), "submit_to_llm: messages submitted to LLM");
    for (i, m) in messages.iter().enumerate() {
        debug!(
            index = i,
            role = m.role.as_str(),
            content = %m.content,
            "submit_to_llm message"
        );
    }
}

/// Coordinates catalog, retrieval, prompt, memory and the completion service.
///
/// Messages of one user are processed one at a time, in arrival order; messages of different users
/// run concurrently. `reply` never fails: every error ends in a logged fallback reply.
pub struct AssistantOrchestrator {
    catalog: Arc<CatalogCache>,
    store: Arc<dyn ConversationStore>,
    llm: Arc<dyn CompletionClient>,
    composer: PromptComposer,
    locks: UserLocks,
}

impl AssistantOrchestrator {
    pub fn new(
        catalog: Arc<CatalogCache>,
        store: Arc<dyn ConversationStore>,
        llm: Arc<dyn CompletionClient>,
        composer: PromptComposer,
    ) -> Self {
        Self {
            catalog,
            store,
            llm,
            composer,
            locks: UserLocks::new(),
        }
    }

    /// In-memory history with the default cap and the default store prompts.
    pub fn with_defaults(catalog: Arc<CatalogCache>, llm: Arc<dyn CompletionClient>) -> Self {
        Self::new(
            catalog,
            Arc::new(InMemoryConversationStore::default()),
            llm,
            PromptComposer::default(),
        )
    }

    pub fn catalog(&self) -> &Arc<CatalogCache> {
        &self.catalog
    }

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.store
    }

    /// Queues a message of `user_id` without waiting. Messages reserved earlier are answered
    /// first; pass the slot to [`Self::reply_in_turn`], possibly from another task. The next
    /// message of the user starts when the slot is dropped.
    pub fn reserve(&self, user_id: &str) -> TurnSlot {
        self.locks.reserve(user_id)
    }

    /// Produces the reply to `user_text` from `user_id`.
    pub async fn reply(&self, user_id: &str, user_text: &str) -> String {
        let mut slot = self.reserve(user_id);
        self.reply_in_turn(&mut slot, user_id, user_text).await
    }

    /// Like [`Self::reply`], with the place in `user_id`'s queue already taken by `slot`. Waits for
    /// the slot's turn; the caller keeps the slot (and the user's queue) until it drops it.
    #[instrument(skip(self, slot, user_text))]
    pub async fn reply_in_turn(&self, slot: &mut TurnSlot, user_id: &str, user_text: &str) -> String {
        slot.wait_turn().await;

        let snapshot = self.catalog.get_current().await;
        let matches = search(user_text, &snapshot.products);
        info!(
            catalog_size = snapshot.len(),
            matches = matches.len(),
            "step: products retrieved"
        );

        let user_turn = ConversationTurn::user(self.composer.user_turn(user_text, &matches));
        let history = self.remember_user_turn(user_id, user_turn).await;

        let history: Vec<ChatMessage> = history.iter().map(ChatMessage::from).collect();
        let messages = self.composer.messages(&snapshot.products, history);
        log_messages_submitted_to_llm(&messages);

        match self.llm.complete(&messages).await {
            Ok(reply) => {
                if let Err(e) = self
                    .store
                    .append(user_id, ConversationTurn::assistant(reply.clone()))
                    .await
                {
                    error!(error = %e, "Failed to store assistant turn");
                }
                info!(reply_len = reply.len(), "step: reply ready");
                reply
            }
            Err(e) => Self::fallback_for(&e).to_string(),
        }
    }

    /// Stores the user turn and returns the history to send. If the store fails, the model still
    /// gets the current turn alone.
    async fn remember_user_turn(&self, user_id: &str, turn: ConversationTurn) -> Vec<ConversationTurn> {
        let stored = async {
            self.store.append(user_id, turn.clone()).await?;
            self.store.history(user_id).await
        };
        match stored.await {
            Ok(history) => history,
            Err(e) => {
                error!(error = %e, "Conversation store failed; replying without history");
                vec![turn]
            }
        }
    }

    fn fallback_for(e: &CompletionError) -> &'static str {
        if e.is_service_error() {
            error!(error = %e, "Completion service reported an error");
            SERVICE_ERROR_REPLY
        } else {
            error!(error = %e, "Completion call failed");
            TRANSPORT_ERROR_REPLY
        }
    }
}

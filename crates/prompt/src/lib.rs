//! # Prompt
//!
//! Builds what the model sees for one customer message.
//!
//! ## Parts
//!
//! - **System message** ([`PromptComposer::system_prompt`]): store persona, tone and formatting rules,
//!   the no-fabrication policy, and a category summary of the current listing
//!   (`- {category} ({n} productos)` per top-level family, first-appearance order).
//! - **Grounding block** ([`PromptComposer::grounding_block`]): the products retrieved for the message,
//!   one `• name | $price | stock\n  🔗 link` entry each, or a sentence stating that nothing in the
//!   catalog matched the query. It is appended to the customer's text to form the stored user turn.
//! - **Chat messages** ([`ChatMessage`]): role + content, one-to-one with the OpenAI `messages` array.
//!
//! ## External interactions
//!
//! - **AI models**: output is sent to OpenAI-compatible chat completion APIs.

mod format;
mod grounding;
mod system;

pub use format::{format_price, price_label, product_link, stock_label, title_case};
pub use grounding::{format_products, NO_MATCHES_TEMPLATE, MATCHES_HEADER};
pub use system::{category_summary, PromptConfig, DEFAULT_PRODUCT_BASE_URL, DEFAULT_STORE_NAME};

use catalog::{Product, ScoredProduct};

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`).
    Assistant,
}

impl MessageRole {
    /// The API `role` string.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single chat message, one-to-one with one element of OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Builds system messages and grounding blocks for one store.
#[derive(Debug, Clone, Default)]
pub struct PromptComposer {
    config: PromptConfig,
}

impl PromptComposer {
    pub fn new(config: PromptConfig) -> Self {
        Self { config }
    }

    /// Instructions plus the category summary of `listing`. Recomputed by callers on every message,
    /// so counts follow the latest refresh.
    pub fn system_prompt(&self, listing: &[Product]) -> String {
        system::build_system_prompt(&self.config, listing)
    }

    /// Retrieved-products block for `query`, starting with a blank line so it can be appended
    /// directly to the customer's text.
    pub fn grounding_block(&self, query: &str, matches: &[ScoredProduct]) -> String {
        grounding::build_grounding_block(&self.config.product_base_url, query, matches)
    }

    /// Content stored as the user turn: the customer's text followed by its grounding block.
    pub fn user_turn(&self, user_text: &str, matches: &[ScoredProduct]) -> String {
        format!("{}{}", user_text, self.grounding_block(user_text, matches))
    }

    /// System message followed by the conversation history, ready for the completion request.
    pub fn messages(&self, listing: &[Product], history: Vec<ChatMessage>) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(self.system_prompt(listing)));
        messages.extend(history);
        messages
    }
}

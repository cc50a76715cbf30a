//! # LLM client abstraction
//!
//! Defines the [`CompletionClient`] trait and an OpenAI-compatible implementation
//! ([`OpenAICompatClient`], works with Groq, OpenAI and similar `/chat/completions` endpoints).
//!
//! Failures are split the way callers need to react to them: [`CompletionError::Service`] when the
//! service answered with an `{"error": ...}` payload, and the other variants when the call itself
//! failed or the answer had an unexpected shape.

use async_trait::async_trait;
use prompt::ChatMessage;
use thiserror::Error;

mod config;
mod mask;
mod openai_compat;

pub use config::{
    EnvLlmConfig, LlmConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};
pub use mask::mask_token;
pub use openai_compat::OpenAICompatClient;

/// Why a completion did not produce a reply.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// The service responded with an error object.
    #[error("completion service error (HTTP {status}): {message}")]
    Service { status: u16, message: String },

    /// Connection, TLS or protocol failure before a response body was read.
    #[error("completion request failed: {0}")]
    Transport(String),

    #[error("completion request timed out")]
    Timeout,

    /// A response arrived but had neither an error object nor `choices[0].message.content`.
    #[error("malformed completion response: {0}")]
    Malformed(String),
}

impl CompletionError {
    /// True when the service itself reported the error (as opposed to the call failing).
    pub fn is_service_error(&self) -> bool {
        matches!(self, CompletionError::Service { .. })
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CompletionError::Timeout
        } else {
            CompletionError::Transport(e.to_string())
        }
    }
}

/// LLM client interface: one chat completion for a list of messages (system/user/assistant).
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the assistant reply text for `messages`. Single attempt, no retries.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}

//! OpenAI-compatible `/chat/completions` client over reqwest.
//!
//! The response body is inspected whatever the HTTP status: an `error` member means the service
//! refused the request ([`CompletionError::Service`]); otherwise `choices[0].message.content` must be
//! present ([`CompletionError::Malformed`] if not).

use std::time::Duration;

use async_trait::async_trait;
use prompt::ChatMessage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::config::{
    LlmConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT_SECS,
};
use crate::mask::mask_token;
use crate::{CompletionClient, CompletionError};

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
    total_tokens: Option<u64>,
}

/// Chat completion client with fixed generation parameters.
#[derive(Clone)]
pub struct OpenAICompatClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAICompatClient {
    /// Client with default endpoint, model, generation parameters and timeout.
    pub fn new(api_key: String) -> Result<Self, CompletionError> {
        Self::build(
            api_key,
            DEFAULT_BASE_URL.to_string(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Client configured from an [`LlmConfig`].
    pub fn from_config(config: &dyn LlmConfig) -> Result<Self, CompletionError> {
        Ok(Self::build(
            config.api_key().to_string(),
            config.base_url().to_string(),
            config.timeout(),
        )?
        .with_model(config.model())
        .with_max_tokens(config.max_tokens())
        .with_temperature(config.temperature()))
    }

    fn build(api_key: String, base_url: String, timeout: Duration) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompletionError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            api_key,
            base_url,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Human-readable message of an `error` member: its `message` field when present.
fn service_error_message(error: &Value) -> String {
    error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}

/// Classifies a completion response body.
fn parse_completion_body(status: u16, body: &str) -> Result<String, CompletionError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        CompletionError::Malformed(format!("HTTP {} with non-JSON body: {}", status, e))
    })?;

    if let Some(err) = value.get("error").filter(|e| !e.is_null()) {
        return Err(CompletionError::Service {
            status,
            message: service_error_message(err),
        });
    }

    let response: ChatCompletionResponse = serde_json::from_value(value)
        .map_err(|e| CompletionError::Malformed(format!("HTTP {}: {}", status, e)))?;

    if let Some(usage) = &response.usage {
        info!(
            prompt_tokens = ?usage.prompt_tokens,
            completion_tokens = ?usage.completion_tokens,
            total_tokens = ?usage.total_tokens,
            "Chat completion usage"
        );
    }

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| {
            CompletionError::Malformed(format!("HTTP {}: empty choices[0].message.content", status))
        })
}

#[async_trait]
impl CompletionClient for OpenAICompatClient {
    #[instrument(skip(self, messages), fields(model = %self.model))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        info!(
            message_count = messages.len(),
            max_tokens = self.max_tokens,
            temperature = self.temperature,
            api_key = %mask_token(&self.api_key),
            "Chat completion request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Chat completion call failed");
                CompletionError::from(e)
            })?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        let result = parse_completion_body(status, &body);
        match &result {
            Ok(reply) => info!(status, reply_len = reply.len(), "Chat completion received"),
            Err(e) => warn!(status, error = %e, "Chat completion unusable"),
        }
        result
    }
}

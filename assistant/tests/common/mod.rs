//! Shared fakes for assistant integration tests: catalog source, completion client, transport.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use catalog::{CatalogCache, CatalogError, CatalogSource, Product};
use llm_client::{CompletionClient, CompletionError};
use prompt::ChatMessage;
use shopbot_core::{BotError, Transport};

pub fn product(code: &str, description: &str, family: &str, price: f64, stock: i64) -> Product {
    Product {
        code: code.to_string(),
        description: description.to_string(),
        family: family.to_string(),
        price: Some(price),
        stock,
    }
}

pub fn mouse_listing() -> Vec<Product> {
    vec![product("A1", "mouse usb gamer", "Perifericos>Mouse", 1500.0, 3)]
}

/// Catalog source returning a replaceable listing (or failing while it is `None`) and counting fetches.
pub struct FixedSource {
    listing: Mutex<Option<Vec<Product>>>,
    pub fetches: AtomicUsize,
}

impl FixedSource {
    pub fn ok(listing: Vec<Product>) -> Self {
        Self {
            listing: Mutex::new(Some(listing)),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            listing: Mutex::new(None),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn set_listing(&self, listing: Vec<Product>) {
        *self.listing.lock().unwrap() = Some(listing);
    }
}

#[async_trait]
impl CatalogSource for FixedSource {
    async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.listing
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| CatalogError::Network("unreachable".to_string()))
    }
}

pub fn cache_with(source: Arc<FixedSource>) -> Arc<CatalogCache> {
    Arc::new(CatalogCache::with_refresh_interval(
        source,
        Duration::from_secs(30 * 60),
    ))
}

/// What the fake completion client answers.
#[derive(Clone)]
pub enum Scripted {
    Reply(String),
    /// Replies with the user text of the last message, after a delay.
    EchoAfter(Duration),
    ServiceError,
    TransportError,
    Malformed,
}

/// Completion client that records every request.
pub struct FakeLlm {
    script: Scripted,
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeLlm {
    pub fn new(script: Scripted) -> Self {
        Self {
            script,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request(&self, i: usize) -> Vec<ChatMessage> {
        self.requests.lock().unwrap()[i].clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for FakeLlm {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        match &self.script {
            Scripted::Reply(text) => Ok(text.clone()),
            Scripted::EchoAfter(delay) => {
                tokio::time::sleep(*delay).await;
                let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
                let first_line = last.lines().next().unwrap_or_default().to_string();
                Ok(format!("eco: {}", first_line))
            }
            Scripted::ServiceError => Err(CompletionError::Service {
                status: 400,
                message: "model_decommissioned".to_string(),
            }),
            Scripted::TransportError => Err(CompletionError::Timeout),
            Scripted::Malformed => Err(CompletionError::Malformed("no choices".to_string())),
        }
    }
}

/// Transport that records sent texts and typing signals; sending can be made to fail.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<(String, String)>>,
    pub typing: Mutex<Vec<String>>,
    pub fail_send: bool,
    pub fail_typing: bool,
}

#[async_trait]
impl Transport for RecordingTransport {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send_text(&self, recipient_id: &str, text: &str) -> shopbot_core::Result<()> {
        if self.fail_send {
            return Err(BotError::Transport("socket closed".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipient_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn send_typing(&self, recipient_id: &str) -> shopbot_core::Result<()> {
        if self.fail_typing {
            return Err(BotError::Transport("presence rejected".to_string()));
        }
        self.typing.lock().unwrap().push(recipient_id.to_string());
        Ok(())
    }
}

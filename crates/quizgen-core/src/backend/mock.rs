//! Mock Backend
//!
//! For testing and demo purposes. Replies with a scripted result and records
//! every prompt it receives.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::Backend;
use crate::error::{BackendError, BackendResult};

/// Backend with a fixed reply
pub struct MockBackend {
    name: String,
    reply: BackendResult<String>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl MockBackend {
    /// Backend that answers every prompt with `text`
    pub fn replying(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, Ok(text.into()))
    }

    /// Backend that fails every call with `error`
    pub fn failing(name: impl Into<String>, error: BackendError) -> Self {
        Self::new(name, Err(error))
    }

    fn new(name: impl Into<String>, reply: BackendResult<String>) -> Self {
        Self {
            name: name.into(),
            reply,
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before replying (for exercising timeouts)
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts received so far, oldest first
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str, _timeout: Duration) -> BackendResult<String> {
        self.prompts.lock().await.push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.reply.clone()
    }
}

//! Upstage Solar Backend
//!
//! OpenAI-compatible chat completions served by Upstage.

use std::time::Duration;

use async_trait::async_trait;
use quizgen_core::{Backend, BackendResult};

use crate::chat;
use crate::config::ChatApiConfig;

/// Registry name
pub const NAME: &str = "solar";

pub struct SolarBackend {
    client: reqwest::Client,
    config: ChatApiConfig,
}

impl SolarBackend {
    pub fn new(client: reqwest::Client, config: ChatApiConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Backend for SolarBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str, timeout: Duration) -> BackendResult<String> {
        chat::complete(&self.client, NAME, &self.config, prompt, timeout).await
    }

    async fn health_check(&self) -> bool {
        self.config.api_key.is_some()
    }
}

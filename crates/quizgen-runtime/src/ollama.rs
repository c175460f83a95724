//! Ollama Backend
//!
//! Local inference through Ollama's `/api/generate` endpoint with streaming
//! disabled. No credentials are involved.

use std::time::Duration;

use async_trait::async_trait;
use quizgen_core::{Backend, BackendResult, GenerationOptions};
use serde::{Deserialize, Serialize};

use crate::config::OllamaConfig;
use crate::http::{post_json, transport_error};

/// Registry name
pub const NAME: &str = "ollama";

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: SamplingOptions,
}

#[derive(Debug, Serialize)]
struct SamplingOptions {
    temperature: f32,

    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

impl From<&GenerationOptions> for SamplingOptions {
    fn from(opts: &GenerationOptions) -> Self {
        Self {
            temperature: opts.temperature,
            top_p: opts.top_p,
            num_predict: opts.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Ollama backend
pub struct OllamaBackend {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaBackend {
    pub fn new(client: reqwest::Client, config: OllamaConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Backend for OllamaBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str, timeout: Duration) -> BackendResult<String> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: SamplingOptions::from(&self.config.generation),
        };

        let response: GenerateResponse = post_json(
            &self.client,
            NAME,
            &self.endpoint("/api/generate"),
            None,
            &request,
            timeout,
        )
        .await?;

        Ok(response.response)
    }

    async fn health_check(&self) -> bool {
        let result = self
            .client
            .get(self.endpoint("/api/tags"))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(status = response.status().as_u16(), "Ollama health check failed");
                false
            }
            Err(e) => {
                tracing::warn!(error = %transport_error(&e, HEALTH_TIMEOUT), "Ollama health check failed");
                false
            }
        }
    }
}

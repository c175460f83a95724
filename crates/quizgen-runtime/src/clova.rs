//! HyperCLOVA X Backend
//!
//! Naver Clova Studio chat completions (v3). The model is part of the
//! endpoint URL; the payload carries only messages and sampling fields, and
//! the reply text lives at `result.message.content`.

use std::time::Duration;

use async_trait::async_trait;
use quizgen_core::{Backend, BackendError, BackendResult};
use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;
use crate::config::ChatApiConfig;
use crate::http::post_json;

/// Registry name
pub const NAME: &str = "hyperclova";

const DEFAULT_TOP_P: f32 = 0.8;
const DEFAULT_MAX_TOKENS: u32 = 512;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClovaRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    top_p: f32,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ClovaResponse {
    result: Option<ClovaResult>,
}

#[derive(Debug, Deserialize)]
struct ClovaResult {
    message: ClovaMessage,
}

#[derive(Debug, Deserialize)]
struct ClovaMessage {
    #[serde(default)]
    content: String,
}

pub struct ClovaBackend {
    client: reqwest::Client,
    config: ChatApiConfig,
}

impl ClovaBackend {
    pub fn new(client: reqwest::Client, config: ChatApiConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Backend for ClovaBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str, timeout: Duration) -> BackendResult<String> {
        let api_key = self.config.bearer()?;

        let opts = &self.config.generation;
        let request = ClovaRequest {
            messages: vec![ChatMessage::user(prompt)],
            top_p: opts.top_p.unwrap_or(DEFAULT_TOP_P),
            temperature: opts.temperature,
            max_tokens: opts.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        };

        let response: ClovaResponse = post_json(
            &self.client,
            NAME,
            &self.config.url,
            Some(api_key),
            &request,
            timeout,
        )
        .await?;

        response
            .result
            .map(|r| r.message.content)
            .ok_or_else(|| BackendError::Transport("response missing result".into()))
    }

    async fn health_check(&self) -> bool {
        self.config.api_key.is_some()
    }
}

//! Chat Wire Types
//!
//! Message and payload shapes for OpenAI-compatible chat-completions APIs,
//! plus the single-turn call shared by the OpenAI and Solar adapters.
//! Clova reuses [`ChatMessage`] with its own envelope.

use std::time::Duration;

use quizgen_core::{BackendError, BackendResult, GenerationOptions};
use serde::{Deserialize, Serialize};

use crate::config::ChatApiConfig;
use crate::http::post_json;

/// Role of a message sender; composed prompts are always sent as the user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// A single outbound chat message
#[derive(Clone, Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

impl<'a> ChatMessage<'a> {
    pub const fn user(content: &'a str) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }
}

/// `POST /chat/completions` body
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

impl<'a> ChatCompletionRequest<'a> {
    /// Single-turn request carrying the composed prompt as the user message
    pub fn single_turn(model: &'a str, prompt: &'a str, options: &GenerationOptions) -> Self {
        Self {
            model,
            messages: vec![ChatMessage::user(prompt)],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplyMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice
    pub fn into_text(self) -> BackendResult<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| BackendError::Transport("response contained no choices".into()))
    }
}

/// Send `prompt` as a single user turn and return the first choice's text
///
/// Fails with `Unauthenticated` before any network I/O when no key is set.
pub(crate) async fn complete(
    client: &reqwest::Client,
    backend: &str,
    config: &ChatApiConfig,
    prompt: &str,
    timeout: Duration,
) -> BackendResult<String> {
    let api_key = config.bearer()?;
    let request = ChatCompletionRequest::single_turn(&config.model, prompt, &config.generation);

    post_json::<_, ChatCompletionResponse>(
        client,
        backend,
        &config.url,
        Some(api_key),
        &request,
        timeout,
    )
    .await?
    .into_text()
}

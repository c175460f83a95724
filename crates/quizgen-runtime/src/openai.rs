//! OpenAI Backend
//!
//! Hosted chat completions, registered as `chatgpt`.

use std::time::Duration;

use async_trait::async_trait;
use quizgen_core::{Backend, BackendResult};

use crate::chat;
use crate::config::ChatApiConfig;

/// Registry name
pub const NAME: &str = "chatgpt";

pub struct OpenAiBackend {
    client: reqwest::Client,
    config: ChatApiConfig,
}

impl OpenAiBackend {
    pub fn new(client: reqwest::Client, config: ChatApiConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Backend for OpenAiBackend {
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

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use quizgen_core::BackendError;
    use serde_json::json;

    use super::*;

    fn backend_for(server: &mockito::ServerGuard, api_key: Option<&str>) -> OpenAiBackend {
        OpenAiBackend::new(
            reqwest::Client::new(),
            ChatApiConfig {
                url: format!("{}/v1/chat/completions", server.url()),
                api_key: api_key.map(String::from),
                ..ChatApiConfig::openai_defaults()
            },
        )
    }

    #[tokio::test]
    async fn test_generate_reads_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "Write a calculus question"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id": "c1", "choices": [{"index": 0, "message": {"role": "assistant", "content": "{\"title\": \"Limits\"}"}}]}"#,
            )
            .create_async()
            .await;

        let text = backend_for(&server, Some("sk-test"))
            .generate("Write a calculus question", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(text, r#"{"title": "Limits"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let backend = backend_for(&server, None);
        let err = backend
            .generate("anything", Duration::from_secs(5))
            .await
            .unwrap_err();

        assert_eq!(err, BackendError::Unauthenticated);
        assert!(!backend.health_check().await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_key_is_http_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error": {"message": "Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let err = backend_for(&server, Some("sk-wrong"))
            .generate("anything", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::HttpStatus(401));
    }
}

//! Runtime Configuration
//!
//! Built once at startup and handed to adapter constructors. Nothing below
//! this module reads the process environment.

use std::time::Duration;

use quizgen_core::{BackendError, BackendResult, DispatchConfig, GenerationOptions, RouterConfig};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

const DEFAULT_OLLAMA_PORT: u16 = 11434;

/// Backend behind `generate_problem_mistral` and advisory routing
const LOCAL_BACKEND: &str = "ollama";

/// Backend behind `generate_problem_with_gpt`
const HOSTED_BACKEND: &str = "chatgpt";

/// Local Ollama endpoint
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    /// Base URL, e.g. `http://localhost:11434`
    pub base_url: String,

    /// Model name
    pub model: String,

    /// Sampling parameters
    pub generation: GenerationOptions,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "mistral".into(),
            generation: GenerationOptions::default(),
        }
    }
}

/// Hosted chat-completions endpoint
#[derive(Clone)]
pub struct ChatApiConfig {
    /// Full endpoint URL
    pub url: String,

    /// Model identifier
    pub model: String,

    /// Bearer token; calls fail with `Unauthenticated` when absent
    pub api_key: Option<String>,

    /// Sampling parameters
    pub generation: GenerationOptions,
}

impl std::fmt::Debug for ChatApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatApiConfig")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("generation", &self.generation)
            .finish()
    }
}

impl ChatApiConfig {
    /// API key for the `Authorization` header
    pub fn bearer(&self) -> BackendResult<&str> {
        self.api_key
            .as_deref()
            .ok_or(BackendError::Unauthenticated)
    }

    pub fn openai_defaults() -> Self {
        Self {
            url: "https://api.openai.com/v1/chat/completions".into(),
            model: "gpt-4o-mini".into(),
            api_key: None,
            generation: GenerationOptions::default(),
        }
    }

    pub fn clova_defaults() -> Self {
        Self {
            url: "https://clovastudio.stream.ntruss.com/testapp/v3/chat-completions/HCX-005".into(),
            model: "HCX-005".into(),
            api_key: None,
            generation: GenerationOptions {
                temperature: 0.7,
                max_tokens: Some(512),
                top_p: Some(0.8),
            },
        }
    }

    pub fn solar_defaults() -> Self {
        Self {
            url: "https://api.upstage.ai/v1/solar/chat/completions".into(),
            model: "solar-1-mini-chat".into(),
            api_key: None,
            generation: GenerationOptions::default(),
        }
    }
}

/// Process-wide configuration
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub ollama: OllamaConfig,
    pub openai: ChatApiConfig,
    pub clova: ChatApiConfig,
    pub solar: ChatApiConfig,

    /// Upper bound for one backend call
    pub request_timeout: Duration,

    /// Backend used by `generate_problem` when no `llm` is given
    pub default_backend: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            ollama: OllamaConfig::default(),
            openai: ChatApiConfig::openai_defaults(),
            clova: ChatApiConfig::clova_defaults(),
            solar: ChatApiConfig::solar_defaults(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_backend: LOCAL_BACKEND.into(),
        }
    }
}

impl RuntimeConfig {
    /// Read configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        let host = get("OLLAMA_HOST").unwrap_or_else(|| "http://localhost".into());
        let mut port = DEFAULT_OLLAMA_PORT;
        if let Some(raw) = get("OLLAMA_PORT") {
            match raw.parse::<u16>() {
                Ok(parsed) => port = parsed,
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid OLLAMA_PORT"),
            }
        }
        config.ollama.base_url = format!("{}:{port}", host.trim_end_matches('/'));
        if let Some(model) = get("OLLAMA_MODEL") {
            config.ollama.model = model;
        }

        apply_chat_env(&mut config.openai, &get, "OPENAI_API_KEY", "OPENAI_API_URL", "OPENAI_MODEL");
        apply_chat_env(&mut config.clova, &get, "CLOVA_API_KEY", "CLOVA_API_URL", "CLOVA_MODEL");
        apply_chat_env(&mut config.solar, &get, "UPSTAGE_API_KEY", "UPSTAGE_API_URL", "SOLAR_MODEL");

        if let Some(raw) = get("REQUEST_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %raw, "Ignoring invalid REQUEST_TIMEOUT_SECS"),
            }
        }

        if let Some(backend) = get("DEFAULT_BACKEND") {
            config.default_backend = backend;
        }

        config
    }

    /// Dispatcher settings derived from this configuration
    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            request_timeout: self.request_timeout,
            ..Default::default()
        }
    }

    /// Tool bindings derived from this configuration
    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            default_backend: self.default_backend.clone(),
            local_backend: LOCAL_BACKEND.into(),
            hosted_backend: HOSTED_BACKEND.into(),
        }
    }
}

fn apply_chat_env<G>(config: &mut ChatApiConfig, get: &G, key_var: &str, url_var: &str, model_var: &str)
where
    G: Fn(&str) -> Option<String>,
{
    config.api_key = get(key_var);
    if let Some(url) = get(url_var) {
        config.url = url;
    }
    if let Some(model) = get(model_var) {
        config.model = model;
    }
}

//! # quizgen-runtime
//!
//! Backend adapters for the quizgen dispatch engine.
//!
//! ## Backends
//!
//! - **ollama** (default): Local inference via Ollama `/api/generate`
//! - **chatgpt**: OpenAI chat completions
//! - **hyperclova**: Naver Clova Studio chat completions
//! - **solar**: Upstage Solar chat completions
//!
//! Each adapter sits behind a cargo feature of the same family name; all are
//! enabled by default.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quizgen_runtime::{RuntimeConfig, build_registry};
//!
//! let config = RuntimeConfig::from_env();
//! let registry = build_registry(&config);
//! let dispatcher = Dispatcher::new(Arc::new(registry), config.dispatch_config());
//! ```

pub mod chat;
pub mod config;
mod http;

#[cfg(feature = "clova")]
pub mod clova;
#[cfg(feature = "ollama")]
pub mod ollama;
#[cfg(feature = "openai")]
pub mod openai;
#[cfg(feature = "solar")]
pub mod solar;

pub use config::{ChatApiConfig, OllamaConfig, RuntimeConfig};

#[cfg(feature = "clova")]
pub use clova::ClovaBackend;
#[cfg(feature = "ollama")]
pub use ollama::OllamaBackend;
#[cfg(feature = "openai")]
pub use openai::OpenAiBackend;
#[cfg(feature = "solar")]
pub use solar::SolarBackend;

use quizgen_core::BackendRegistry;

/// Register every compiled-in backend, sharing one HTTP client
#[allow(unused_mut, unused_variables)]
pub fn build_registry(config: &RuntimeConfig) -> BackendRegistry {
    let client = reqwest::Client::new();
    let mut registry = BackendRegistry::new();

    #[cfg(feature = "ollama")]
    registry.register(OllamaBackend::new(client.clone(), config.ollama.clone()));

    #[cfg(feature = "openai")]
    registry.register(OpenAiBackend::new(client.clone(), config.openai.clone()));

    #[cfg(feature = "clova")]
    registry.register(ClovaBackend::new(client.clone(), config.clova.clone()));

    #[cfg(feature = "solar")]
    registry.register(SolarBackend::new(client, config.solar.clone()));

    tracing::info!(backends = ?registry.names(), "Backend registry ready");
    registry
}

// Re-export core types for convenience
pub use quizgen_core::{Backend, BackendError, Dispatcher, Problem, ToolRouter};

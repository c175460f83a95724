//! Backend Strategy Pattern
//!
//! Every text-generation provider (local model or cloud chat API) is reached
//! through the single [`Backend`] capability. The dispatcher never branches on
//! provider type; it looks backends up by name in a [`BackendRegistry`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quizgen_core::backend::{Backend, BackendRegistry};
//!
//! let mut registry = BackendRegistry::new();
//! registry.register(OllamaBackend::new(client, &config.ollama));
//!
//! let text = registry.get("ollama").unwrap().generate(prompt, timeout).await?;
//! ```

mod mock;

pub use mock::MockBackend;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BackendResult;

/// Sampling parameters sent with each request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate (provider default when unset)
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Top-p nucleus sampling (provider default when unset)
    #[serde(default)]
    pub top_p: Option<f32>,
}

const fn default_temperature() -> f32 {
    0.7
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: None,
            top_p: None,
        }
    }
}

/// A named text-generation provider
///
/// Implementations make exactly one outbound call per [`generate`](Backend::generate)
/// and translate every failure into a [`BackendError`](crate::error::BackendError).
/// They never retry and never alter the prompt.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Registry name (e.g. "ollama", "chatgpt")
    fn name(&self) -> &str;

    /// Model identifier sent to the provider
    fn model(&self) -> &str;

    /// Send a fully composed prompt and return the reply text
    async fn generate(&self, prompt: &str, timeout: Duration) -> BackendResult<String>;

    /// Check whether the provider is reachable
    async fn health_check(&self) -> bool {
        true
    }
}

/// Name-to-implementation lookup for backends
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: BTreeMap<String, Arc<dyn Backend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under its own name
    pub fn register<B: Backend + 'static>(&mut self, backend: B) {
        self.register_shared(Arc::new(backend));
    }

    /// Register an already shared backend
    pub fn register_shared(&mut self, backend: Arc<dyn Backend>) {
        let name = backend.name().to_string();
        if self.backends.insert(name.clone(), backend).is_some() {
            tracing::warn!(backend = %name, "Replacing previously registered backend");
        }
    }

    /// Look up a backend by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Backend>> {
        self.backends.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.backends.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.backends.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("backends", &self.names())
            .finish()
    }
}

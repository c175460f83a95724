//! Dispatcher
//!
//! The orchestration spine: resolve a backend by name, compose the prompt,
//! make a single attempt under a request-scoped timeout, then pipe the reply
//! through extraction and normalization.
//!
//! ```text
//! invoke(name, prompt)
//!   ├─ unknown name ─────────────▶ Unsupported-Backend Problem
//!   ├─ Backend::generate
//!   │    ├─ BackendError ────────▶ Fallback Problem
//!   │    └─ text ─▶ extract ─▶ normalize ─▶ Problem / Parse-Error Problem
//! ```
//!
//! Every path ends in a [`Problem`]; nothing here returns an error. Dropping
//! the returned future cancels the in-flight backend call.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::backend::{Backend, BackendRegistry};
use crate::error::{BackendError, BackendResult};
use crate::extract::extract;
use crate::normalize::normalize;
use crate::problem::Problem;
use crate::prompt::{GENERAL, PromptTemplate};

/// Dispatcher configuration
#[derive(Clone, Debug)]
pub struct DispatchConfig {
    /// Upper bound for a single backend call
    pub request_timeout: Duration,

    /// Template used by [`Dispatcher::invoke`]
    pub template: PromptTemplate,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
            template: GENERAL,
        }
    }
}

/// Stateless single-attempt dispatcher
#[derive(Clone)]
pub struct Dispatcher {
    backends: Arc<BackendRegistry>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(backends: Arc<BackendRegistry>, config: DispatchConfig) -> Self {
        Self { backends, config }
    }

    /// Create with default configuration
    pub fn with_defaults(backends: Arc<BackendRegistry>) -> Self {
        Self::new(backends, DispatchConfig::default())
    }

    pub fn backends(&self) -> &BackendRegistry {
        &self.backends
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Whether `name` resolves to a registered backend
    pub fn supports(&self, name: &str) -> bool {
        self.backends.contains(name)
    }

    /// Generate a problem with the default template
    pub async fn invoke(&self, backend_name: &str, user_prompt: &str) -> Problem {
        self.invoke_with(backend_name, &self.config.template, user_prompt)
            .await
    }

    /// Generate a problem with an explicit prompt template
    pub async fn invoke_with(
        &self,
        backend_name: &str,
        template: &PromptTemplate,
        user_prompt: &str,
    ) -> Problem {
        let Some(backend) = self.backends.get(backend_name) else {
            tracing::warn!(backend = %backend_name, "Unsupported backend requested");
            return Problem::unsupported_backend(backend_name);
        };

        tracing::info!(
            backend = %backend_name,
            model = %backend.model(),
            template = template.name,
            "Dispatching problem request"
        );

        let started = Instant::now();
        let prompt = template.compose(user_prompt);

        match self.call(backend.as_ref(), &prompt).await {
            Ok(text) => {
                tracing::debug!(backend = %backend_name, reply = %text, "Raw LLM response");
                let problem = normalize(extract(&text));
                tracing::info!(
                    backend = %backend_name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    parse_error = problem.is_parse_error(),
                    "Problem generated"
                );
                problem
            }
            Err(e) => {
                tracing::warn!(
                    backend = %backend_name,
                    kind = e.kind(),
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Backend call failed, returning fallback problem"
                );
                Problem::fallback(backend_name, &e)
            }
        }
    }

    /// Single backend call bounded by the request timeout
    ///
    /// The adapter receives the same timeout for its own transport; the outer
    /// bound covers adapters that ignore it.
    pub async fn call(&self, backend: &dyn Backend, prompt: &str) -> BackendResult<String> {
        let timeout = self.config.request_timeout;
        tokio::time::timeout(timeout, backend.generate(prompt, timeout))
            .await
            .unwrap_or(Err(BackendError::Timeout(timeout)))
    }
}

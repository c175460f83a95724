//! Application State

use std::sync::Arc;

use quizgen_core::{BackendRegistry, Dispatcher, ToolRouter};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Tool router wrapping the dispatcher and backend registry
    pub router: Arc<ToolRouter>,
}

impl AppState {
    pub fn new(router: ToolRouter) -> Self {
        Self {
            router: Arc::new(router),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        self.router.dispatcher()
    }

    pub fn backends(&self) -> &BackendRegistry {
        self.dispatcher().backends()
    }

    /// Backend used when a call names none
    pub fn default_backend(&self) -> &str {
        &self.router.config().default_backend
    }
}

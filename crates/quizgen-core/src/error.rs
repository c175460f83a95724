//! Error Types
//!
//! Two error families cross component boundaries inside the engine. Neither
//! is ever surfaced to a caller of the dispatcher: both are absorbed into a
//! schema-valid [`Problem`](crate::problem::Problem).

use std::time::Duration;

use thiserror::Error;

/// Result type alias for backend calls
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Failure of a single backend invocation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The call exceeded its request-scoped timeout
    #[error("Request timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    /// The provider answered with a non-2xx status
    #[error("Provider returned HTTP {0}")]
    HttpStatus(u16),

    /// Connection, DNS, TLS or body decoding failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// No credentials configured for this provider
    #[error("Missing API credentials")]
    Unauthenticated,
}

impl BackendError {
    /// Short machine-readable tag, used in structured logs
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::HttpStatus(_) => "http_status",
            Self::Transport(_) => "transport",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}

/// Failure to pull a JSON object out of free-form LLM text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The text contains no `{ ... }` span and is not JSON itself
    #[error("No JSON object found in response")]
    NoJsonFound,

    /// A candidate span was found but could not be parsed as an object
    #[error("Malformed JSON: {0}")]
    MalformedJson(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        assert_eq!(
            BackendError::Timeout(Duration::from_secs(30)).to_string(),
            "Request timed out after 30s"
        );
        assert_eq!(
            BackendError::HttpStatus(503).to_string(),
            "Provider returned HTTP 503"
        );
        assert_eq!(BackendError::HttpStatus(503).kind(), "http_status");
    }
}

//! HTTP Handlers

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use serde::Serialize;

use quizgen_core::{RouterError, ToolCall, ToolName, ToolOutput};

use crate::state::AppState;

/// Prompt sent by the `/test-llm` smoke check
const GREETING_PROMPT: &str = "Generate a short greeting message.";

/// Characters of the `/test-llm` reply returned to the caller
const SAMPLE_LIMIT: usize = 200;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub default_backend: String,
    pub backends: Vec<String>,
    pub tools: Vec<ToolInfo>,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub call: &'static str,
    pub health: &'static str,
    pub test_llm: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub local_model_reachable: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TestLlmResponse {
    Success {
        model: String,
        sample_response: String,
    },
    Error {
        message: String,
    },
}

// ============================================================================
// Handlers
// ============================================================================

/// Service banner
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        status: "online",
        service: "quizgen",
        version: env!("CARGO_PKG_VERSION"),
        default_backend: state.default_backend().to_string(),
        backends: state.backends().names().into_iter().map(String::from).collect(),
        tools: ToolName::ALL
            .into_iter()
            .map(|tool| ToolInfo {
                name: tool.as_str(),
                description: tool.description(),
            })
            .collect(),
        endpoints: Endpoints {
            call: "/call",
            health: "/health",
            test_llm: "/test-llm",
        },
    })
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let local = &state.router.config().local_backend;
    let local_model_reachable = match state.backends().get(local) {
        Some(backend) => backend.health_check().await,
        None => false,
    };

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        local_model_reachable,
    })
}

/// Tool invocation endpoint
///
/// Malformed envelopes are reported as `INVALID_BODY` in the same
/// `{error, code}` shape as routing errors.
pub async fn call_tool(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ToolOutput>, ApiError> {
    let call: ToolCall = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Rejected malformed call envelope");
        error_response(StatusCode::BAD_REQUEST, "INVALID_BODY", format!("Invalid request body: {e}"))
    })?;

    let output = state.router.route(&call).await.map_err(|e| {
        tracing::warn!(tool = %call.tool, code = e.code(), error = %e, "Tool call rejected");
        error_response(status_for(&e), e.code(), e.to_string())
    })?;

    Ok(Json(output))
}

/// Smoke test against the default backend
pub async fn test_llm(State(state): State<AppState>) -> Json<TestLlmResponse> {
    let name = state.default_backend();
    let Some(backend) = state.backends().get(name) else {
        return Json(TestLlmResponse::Error {
            message: format!("Unsupported LLM backend: {name}"),
        });
    };

    match state.dispatcher().call(backend.as_ref(), GREETING_PROMPT).await {
        Ok(reply) => Json(TestLlmResponse::Success {
            model: backend.model().to_string(),
            sample_response: sample(&reply),
        }),
        Err(e) => {
            tracing::error!(backend = %name, error = %e, "LLM smoke test failed");
            Json(TestLlmResponse::Error {
                message: e.to_string(),
            })
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn error_response(status: StatusCode, code: &str, error: String) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error,
            code: code.into(),
        }),
    )
}

const fn status_for(error: &RouterError) -> StatusCode {
    match error {
        RouterError::UnknownTool(_) | RouterError::UnsupportedBackend(_) => StatusCode::BAD_REQUEST,
        RouterError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn sample(reply: &str) -> String {
    match reply.char_indices().nth(SAMPLE_LIMIT) {
        Some((idx, _)) => format!("{}...", &reply[..idx]),
        None => reply.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&RouterError::UnknownTool("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&RouterError::InvalidInput("x".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_sample_truncation() {
        assert_eq!(sample("Hello!"), "Hello!");

        let long = "a".repeat(250);
        let cut = sample(&long);
        assert_eq!(cut.len(), 203);
        assert!(cut.ends_with("..."));
    }
}

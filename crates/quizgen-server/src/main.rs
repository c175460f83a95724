//! quizgen HTTP Server
//!
//! Axum-based server exposing the problem generator as a single tool-call
//! endpoint plus a few operational routes.

mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quizgen_core::{Dispatcher, ToolName, ToolRouter};
use quizgen_runtime::{RuntimeConfig, build_registry};

use crate::handlers::{call_tool, health_check, root, test_llm};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RuntimeConfig::from_env();
    tracing::debug!(?config, "Runtime configuration loaded");

    let registry = Arc::new(build_registry(&config));
    if !registry.contains(&config.default_backend) {
        tracing::warn!(
            backend = %config.default_backend,
            "⚠ DEFAULT_BACKEND is not registered - generate_problem without llm will fall back"
        );
    }

    let dispatcher = Dispatcher::new(registry, config.dispatch_config());
    let router = ToolRouter::new(dispatcher, config.router_config());
    let state = AppState::new(router);

    // Verify local model connection
    let local = &state.router.config().local_backend;
    match state.backends().get(local) {
        Some(backend) if backend.health_check().await => {
            tracing::info!("✓ Connected to {} ({})", local, backend.model());
        }
        _ => {
            tracing::warn!("⚠ {} not available - local generation will fall back", local);
            tracing::warn!("  Make sure Ollama is running: ollama serve");
        }
    }

    tracing::info!("Available tools:");
    for tool in ToolName::ALL {
        tracing::info!("  • {} - {}", tool, tool.description());
    }

    let app = app(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:11500".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 quizgen server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /          - Service info");
    tracing::info!("  GET  /health    - Health check");
    tracing::info!("  GET  /test-llm  - Default backend smoke test");
    tracing::info!("  POST /call      - Invoke a problem generation tool");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/test-llm", get(test_llm))
        .route("/call", post(call_tool))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(axum::middleware::from_fn(middleware::log_requests)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use quizgen_core::backend::MockBackend;
    use quizgen_core::{BackendError, BackendRegistry, RouterConfig};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    const REPLY: &str = r#"Here you go: {"title": "Fractions", "content": "What is 1/2 + 1/4?",
        "type": "select", "options": ["3/4", "1/2", "2/6", "1"], "answer": "3/4",
        "category": "Math/Arithmetic/Fractions"}"#;

    fn test_app(ollama: MockBackend) -> Router {
        let mut registry = BackendRegistry::new();
        registry.register(ollama);
        registry.register(MockBackend::failing("chatgpt", BackendError::HttpStatus(500)));

        let dispatcher = Dispatcher::with_defaults(Arc::new(registry));
        app(AppState::new(ToolRouter::new(dispatcher, RouterConfig::default())))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_call(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/call")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_call_returns_normalized_problem() {
        let app = test_app(MockBackend::replying("ollama", REPLY));
        let body = json!({"tool": "generate_problem", "input": {"prompt": "fractions"}});

        let (status, value) = send(app, post_call(&body.to_string())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["output"]["title"], "Fractions");
        assert_eq!(value["output"]["type"], "select");
        assert_eq!(value["output"]["answer"], "3/4");
    }

    #[tokio::test]
    async fn test_backend_failure_is_still_ok() {
        let app = test_app(MockBackend::replying("ollama", REPLY));
        let body = json!({"tool": "generate_problem_with_gpt", "input": {"prompt": "calculus"}});

        let (status, value) = send(app, post_call(&body.to_string())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["output"]["category"], "Error/Fallback");
    }

    #[tokio::test]
    async fn test_envelope_errors() {
        let cases = [
            ("{not json", StatusCode::BAD_REQUEST, "INVALID_BODY"),
            (
                r#"{"tool": "summarize", "input": {"prompt": "x"}}"#,
                StatusCode::BAD_REQUEST,
                "UNKNOWN_TOOL",
            ),
            (
                r#"{"tool": "generate_problem", "input": {"prompt": "x", "llm": "gemini"}}"#,
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_BACKEND",
            ),
            (
                r#"{"tool": "generate_problem", "input": {}}"#,
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_INPUT",
            ),
        ];

        for (body, expected_status, expected_code) in cases {
            let app = test_app(MockBackend::replying("ollama", REPLY));
            let (status, value) = send(app, post_call(body)).await;

            assert_eq!(status, expected_status, "{body}");
            assert_eq!(value["code"], expected_code, "{body}");
            assert!(value["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_root_lists_backends() {
        let app = test_app(MockBackend::replying("ollama", REPLY));
        let (status, value) = send(app, get_request("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["status"], "online");
        assert_eq!(value["default_backend"], "ollama");
        assert_eq!(value["backends"], json!(["chatgpt", "ollama"]));

        let tools = value["tools"].as_array().unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(
            names,
            vec!["generate_problem", "generate_problem_mistral", "generate_problem_with_gpt"]
        );
        assert!(tools.iter().all(|t| !t["description"].as_str().unwrap().is_empty()));
    }

    #[tokio::test]
    async fn test_health_reports_local_model() {
        let app = test_app(MockBackend::replying("ollama", REPLY));
        let (_, value) = send(app, get_request("/health")).await;

        assert_eq!(value["status"], "healthy");
        assert_eq!(value["local_model_reachable"], true);
    }

    #[tokio::test]
    async fn test_llm_smoke_check_truncates_sample() {
        let app = test_app(MockBackend::replying("ollama", &"hi ".repeat(100)));
        let (_, value) = send(app, get_request("/test-llm")).await;

        assert_eq!(value["status"], "success");
        assert_eq!(value["model"], "mock");
        let sample = value["sample_response"].as_str().unwrap();
        assert_eq!(sample.len(), 203);
        assert!(sample.ends_with("..."));
    }

    #[tokio::test]
    async fn test_llm_smoke_check_reports_error() {
        let app = test_app(MockBackend::failing("ollama", BackendError::Unauthenticated));
        let (_, value) = send(app, get_request("/test-llm")).await;

        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], "Missing API credentials");
    }

    #[tokio::test]
    async fn test_response_carries_request_id() {
        let app = test_app(MockBackend::replying("ollama", REPLY));
        let response = app.oneshot(get_request("/")).await.unwrap();

        assert!(response.headers().contains_key("x-request-id"));
    }
}

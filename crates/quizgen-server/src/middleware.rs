//! Request Logging
//!
//! Tags every request with a uuid, logs POST/PUT bodies (truncated) and the
//! final status with elapsed time. The id is echoed in `x-request-id`.

use std::time::Instant;

use axum::{
    Json,
    body::Body,
    extract::Request,
    http::{HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::handlers::ErrorResponse;

/// Characters of a request body kept in logs
const BODY_LOG_LIMIT: usize = 1000;

/// Largest body the middleware will buffer
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let started = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    tracing::info!(%request_id, %method, %uri, "Request received");

    let request = if method == Method::POST || method == Method::PUT {
        let (parts, body) = request.into_parts();
        match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => {
                tracing::info!(
                    %request_id,
                    body = %truncate_body(&String::from_utf8_lossy(&bytes)),
                    "Request body"
                );
                Request::from_parts(parts, Body::from(bytes))
            }
            Err(e) => {
                tracing::warn!(%request_id, error = %e, "Failed to read request body");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Could not read request body: {e}"),
                        code: "INVALID_BODY".into(),
                    }),
                )
                    .into_response();
            }
        }
    } else {
        request
    };

    let mut response = next.run(request).await;

    tracing::info!(
        %request_id,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(BODY_LOG_LIMIT) {
        Some((idx, _)) => format!("{}... [truncated]", &body[..idx]),
        None => body.to_string(),
    }
}

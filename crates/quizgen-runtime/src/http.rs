//! Shared HTTP transport
//!
//! One POST per call, no retries. Every reqwest failure is folded into the
//! [`BackendError`] taxonomy here so adapters only deal with wire shapes.

use std::time::Duration;

use quizgen_core::{BackendError, BackendResult};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Characters of an error body kept in logs
const ERROR_BODY_PREVIEW: usize = 200;

/// POST a JSON body and decode a JSON reply
pub(crate) async fn post_json<Req, Resp>(
    client: &reqwest::Client,
    backend: &str,
    url: &str,
    bearer: Option<&str>,
    body: &Req,
    timeout: Duration,
) -> BackendResult<Resp>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let mut request = client.post(url).timeout(timeout).json(body);
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }

    let response = request
        .send()
        .await
        .map_err(|e| transport_error(&e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        tracing::warn!(
            backend,
            status = status.as_u16(),
            body = %preview(&text, ERROR_BODY_PREVIEW),
            "Provider returned error status"
        );
        return Err(BackendError::HttpStatus(status.as_u16()));
    }

    response.json::<Resp>().await.map_err(|e| {
        if e.is_timeout() {
            BackendError::Timeout(timeout)
        } else {
            BackendError::Transport(format!("invalid response body: {e}"))
        }
    })
}

pub(crate) fn transport_error(e: &reqwest::Error, timeout: Duration) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout(timeout)
    } else {
        BackendError::Transport(e.to_string())
    }
}

/// First `max_chars` characters of `text`
pub(crate) fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

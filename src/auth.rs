use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::sync::Arc;

use crate::state::AppState;

/// Bearer-token gate for the whole API.
///
/// The expected token lives in `SoleraConfig::token`; an empty value turns
/// the gate off so local development needs no credentials.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let expected = state.config.token.as_str();
    if expected.is_empty() {
        return next.run(request).await;
    }

    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("");

    if eq_constant_time(presented.as_bytes(), expected.as_bytes()) {
        return next.run(request).await;
    }

    let body = json!({ "error": "unauthorized" });
    (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
}

/// Byte comparison without an early exit, so response timing does not leak
/// how much of a presented token matched.
fn eq_constant_time(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

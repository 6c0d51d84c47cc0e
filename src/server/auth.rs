//! Shared-key authentication middleware

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use super::AppState;
use crate::telemetry;

/// Header carrying the proxy key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject requests whose `X-API-Key` header does not match the configured key.
///
/// Runs before the cache: an unauthenticated request never sees cached data
/// and never reaches the upstream.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let authorized = request
        .headers()
        .get(API_KEY_HEADER)
        .is_some_and(|value| constant_time_eq(value.as_bytes(), state.proxy_key.as_bytes()));

    if !authorized {
        warn!(
            method = %request.method(),
            path = request.uri().path(),
            "rejected request with missing or invalid API key"
        );
        metrics::counter!(telemetry::AUTH_FAILURES_TOTAL).increment(1);
        return Err(AuthError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Compare two byte strings without short-circuiting on the first difference.
///
/// Length is not secret; only the content comparison is constant-time.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_keys_match() {
        assert!(constant_time_eq(b"s3cret", b"s3cret"));
    }

    #[test]
    fn different_keys_do_not_match() {
        assert!(!constant_time_eq(b"s3cret", b"s3creT"));
        assert!(!constant_time_eq(b"s3cret", b"s3cret "));
        assert!(!constant_time_eq(b"", b"s3cret"));
    }
}

//! Response caching middleware

use axum::{
    body::Body,
    extract::{Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use super::AppState;
use crate::cache::{CachedResponse, route_key};

/// Response extension set by handlers when the body was built from
/// incomplete upstream data. Such responses are served but never cached.
#[derive(Debug, Clone, Copy)]
pub struct Incomplete;

/// Serve a stored body when one is fresh; otherwise run the handler and
/// store its body if the response is a complete success.
pub async fn cache_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let key = route_key(request.method(), request.uri().path());

    if let Some(hit) = state.cache.get(&key).await {
        debug!(route = %key, "cache hit");
        return replay(hit);
    }

    let response = next.run(request).await;

    if !response.status().is_success() || response.extensions().get::<Incomplete>().is_some() {
        debug!(route = %key, status = %response.status(), "response not cached");
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(route = %key, error = %e, "failed to buffer response body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    state
        .cache
        .insert(
            key.clone(),
            CachedResponse {
                body: bytes.clone(),
                content_type: parts.headers.get(CONTENT_TYPE).cloned(),
            },
        )
        .await;
    debug!(route = %key, bytes = bytes.len(), "response cached");

    Response::from_parts(parts, Body::from(bytes))
}

fn replay(hit: CachedResponse) -> Response {
    let mut response = Response::new(Body::from(hit.body));
    if let Some(content_type) = hit.content_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    response
}

//! Route handlers.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use super::{AppState, Incomplete};
use crate::types::Fetched;
use crate::version::{self, BuildInfo};

/// Serialize a catalog result, tagging it when it was built from failed calls.
fn respond<T: Serialize>(fetched: Fetched<T>) -> Response {
    let mut response = Json(fetched.value).into_response();
    if !fetched.complete {
        response.extensions_mut().insert(Incomplete);
    }
    response
}

/// GET /config
pub async fn config(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "baseUrl": &*state.upstream_url }))
}

/// GET /artists
pub async fn artists(State(state): State<AppState>) -> Response {
    respond(state.catalog.artists().await)
}

/// GET /albums
pub async fn albums(State(state): State<AppState>) -> Response {
    respond(state.catalog.albums().await)
}

/// GET /songs
pub async fn songs(State(state): State<AppState>) -> Response {
    respond(state.catalog.songs().await)
}

/// GET /stats
pub async fn stats(State(state): State<AppState>) -> Response {
    respond(state.catalog.stats().await)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    pub build: BuildInfo,
}

/// GET /health
///
/// Liveness only. No authentication, no upstream call.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: version::version_string(),
        build: BuildInfo::current(),
    })
}

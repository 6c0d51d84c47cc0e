//! HTTP surface of the proxy.
//!
//! Request flow for the library routes:
//!
//! ```text
//! auth_middleware -> cache_middleware -> handler -> Catalog -> LibrarySource
//! ```
//!
//! `/config` sits behind the auth gate but is never cached; `/health` is
//! open and touches neither the cache nor the upstream.

pub mod auth;
pub mod cache;
#[cfg(feature = "server")]
pub mod config;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::get;

use crate::cache::ResponseCache;
use crate::catalog::Catalog;
use crate::config::ProxyConfig;
use crate::upstream::SubsonicClient;
use crate::Result;

pub use auth::{API_KEY_HEADER, AuthError, auth_middleware};
pub use cache::{Incomplete, cache_middleware};

/// State shared by every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub cache: Arc<ResponseCache>,
    /// Shared key expected in the `X-API-Key` header.
    pub proxy_key: Arc<str>,
    /// Upstream base URL, echoed by `/config`.
    pub upstream_url: Arc<str>,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        cache: ResponseCache,
        proxy_key: impl Into<Arc<str>>,
        upstream_url: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            cache: Arc::new(cache),
            proxy_key: proxy_key.into(),
            upstream_url: upstream_url.into(),
        }
    }

    /// Wire a Subsonic client, catalog and cache from a validated config.
    pub fn from_config(config: &ProxyConfig) -> Result<Self> {
        config.validate()?;
        let client = SubsonicClient::with_timeout(
            config.upstream_url.as_str(),
            config.credentials.clone(),
            config.upstream_timeout,
        )?;
        let catalog = Catalog::new(Arc::new(client), config.catalog);
        let cache = ResponseCache::new(&config.cache);
        Ok(Self::new(
            catalog,
            cache,
            config.proxy_key.as_str(),
            config.upstream_url.as_str(),
        ))
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    // Library routes: cached, then guarded
    let cached = Router::new()
        .route("/artists", get(handlers::artists))
        .route("/albums", get(handlers::albums))
        .route("/songs", get(handlers::songs))
        .route("/stats", get(handlers::stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            cache_middleware,
        ));

    let protected = Router::new()
        .route("/config", get(handlers::config))
        .merge(cached)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let public = Router::new().route("/health", get(handlers::health));

    Router::new()
        .merge(protected)
        .merge(public)
        .with_state(state)
}

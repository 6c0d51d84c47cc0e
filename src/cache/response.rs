//! Route-keyed response cache.
//!
//! [`ResponseCache`] stores the serialized body of a successful response
//! under `"{METHOD} {path}"`. Query strings and headers are not part of the
//! key, so every caller of a route shares one entry.
//!
//! # Expiry
//!
//! Entries live for [`CacheConfig::ttl`] from insertion. Expiry is evaluated
//! on read: moka never returns an entry older than its time-to-live, whether
//! or not its housekeeping has physically evicted it yet. No background task
//! is spawned by this crate.
//!
//! # What gets stored
//!
//! Only complete, successful responses. The decision is made by the caller
//! (see [`crate::server::cache_middleware`]); this type stores whatever it
//! is given.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderValue, Method};
use moka::future::Cache;

use crate::telemetry;

/// Default cache lifetime: 15 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(900);

/// Longest time-to-live moka accepts (1000 years).
pub const MAX_TTL: Duration = Duration::from_secs(1000 * 365 * 24 * 3600);

/// Configuration for the response cache.
///
/// ```rust
/// # use huginn::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(16)
///     .ttl(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached routes. Default: 64.
    pub max_entries: u64,
    /// Time-to-live for cached entries. Default: 900 seconds.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 64,
            ttl: DEFAULT_TTL,
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// A stored response body.
#[derive(Clone, Debug, PartialEq)]
pub struct CachedResponse {
    pub body: Bytes,
    pub content_type: Option<HeaderValue>,
}

/// In-memory response cache shared by all request handlers.
pub struct ResponseCache {
    cache: Cache<String, CachedResponse>,
}

impl ResponseCache {
    /// Create a new response cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self { cache }
    }

    /// Look up a route. Returns `None` on miss or expiry. Emits hit/miss metrics.
    pub async fn get(&self, key: &str) -> Option<CachedResponse> {
        match self.cache.get(key).await {
            Some(hit) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "route" => key.to_string())
                    .increment(1);
                Some(hit)
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "route" => key.to_string())
                    .increment(1);
                None
            }
        }
    }

    /// Store (or replace) the response for a route.
    pub async fn insert(&self, key: impl Into<String>, response: CachedResponse) {
        self.cache.insert(key.into(), response).await;
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

/// Cache key for a request: method and path only.
pub fn route_key(method: &Method, path: &str) -> String {
    format!("{method} {path}")
}

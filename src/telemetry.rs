//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus);
//! without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `huginn_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `endpoint`: Subsonic endpoint name (e.g. "getArtists")
//! - `route`: cache key of a proxied route (e.g. "GET /stats")
//! - `status`: outcome: "ok" or "error"

/// Total upstream requests issued.
///
/// Labels: `endpoint`, `status` ("ok" | "error").
pub const UPSTREAM_REQUESTS_TOTAL: &str = "huginn_upstream_requests_total";

/// Total response cache hits.
///
/// Labels: `route`.
pub const CACHE_HITS_TOTAL: &str = "huginn_cache_hits_total";

/// Total response cache misses (including expired entries).
///
/// Labels: `route`.
pub const CACHE_MISSES_TOTAL: &str = "huginn_cache_misses_total";

/// Total requests rejected by the API key gate.
pub const AUTH_FAILURES_TOTAL: &str = "huginn_auth_failures_total";

//! Caching subsystem.
//!
//! - [`response::ResponseCache`]: TTL cache of serialized response bodies,
//!   keyed by route. Wrapped around the read endpoints by
//!   [`crate::server::cache_middleware`].

pub mod response;

pub use response::{CacheConfig, CachedResponse, MAX_TTL, ResponseCache, route_key};

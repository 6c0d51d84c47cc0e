//! Tests for [`ResponseCache`]: route-keyed TTL cache of response bodies.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderValue, Method};
use huginn::cache::{CacheConfig, CachedResponse, ResponseCache, route_key};

fn body(text: &str) -> CachedResponse {
    CachedResponse {
        body: Bytes::from(text.to_string()),
        content_type: Some(HeaderValue::from_static("application/json")),
    }
}

// =========================================================================
// CacheConfig
// =========================================================================

#[test]
fn cache_config_builder() {
    let config = CacheConfig::new()
        .max_entries(8)
        .ttl(Duration::from_secs(60));
    assert_eq!(config.max_entries, 8);
    assert_eq!(config.ttl, Duration::from_secs(60));
}

// =========================================================================
// Lookup
// =========================================================================

#[tokio::test]
async fn miss_then_hit() {
    let cache = ResponseCache::new(&CacheConfig::default());
    let key = route_key(&Method::GET, "/artists");

    // Miss
    assert!(cache.get(&key).await.is_none());

    // Insert
    cache.insert(key.clone(), body("[]")).await;

    // Hit
    let cached = cache.get(&key).await.expect("should hit");
    assert_eq!(cached, body("[]"));
}

#[tokio::test]
async fn different_route_is_miss() {
    let cache = ResponseCache::new(&CacheConfig::default());
    cache
        .insert(route_key(&Method::GET, "/artists"), body("[]"))
        .await;

    assert!(cache.get(&route_key(&Method::GET, "/albums")).await.is_none());
}

#[tokio::test]
async fn insert_replaces_existing_entry() {
    let cache = ResponseCache::new(&CacheConfig::default());
    let key = route_key(&Method::GET, "/stats");

    cache.insert(key.clone(), body("old")).await;
    cache.insert(key.clone(), body("new")).await;

    assert_eq!(cache.get(&key).await.unwrap().body, Bytes::from("new"));
}

#[tokio::test]
async fn entry_expires_after_ttl() {
    let cache = ResponseCache::new(&CacheConfig::new().ttl(Duration::from_millis(200)));
    let key = route_key(&Method::GET, "/songs");

    cache.insert(key.clone(), body("[]")).await;
    assert!(cache.get(&key).await.is_some());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(cache.get(&key).await.is_none(), "stale entry must read as absent");
}

#[tokio::test]
async fn clear_drops_everything() {
    let cache = ResponseCache::new(&CacheConfig::default());
    let key = route_key(&Method::GET, "/albums");
    cache.insert(key.clone(), body("[]")).await;

    cache.clear();

    assert!(cache.get(&key).await.is_none());
}

#[tokio::test]
async fn concurrent_readers_and_writers() {
    let cache = Arc::new(ResponseCache::new(&CacheConfig::default()));

    let mut handles = Vec::new();
    for i in 0..32 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            let key = route_key(&Method::GET, &format!("/route-{}", i % 4));
            cache.insert(key.clone(), body(&format!("{}", i % 4))).await;
            cache.get(&key).await
        }));
    }

    for handle in handles {
        let hit = handle.await.unwrap().expect("own write should be visible");
        let text = std::str::from_utf8(&hit.body).unwrap();
        assert!(["0", "1", "2", "3"].contains(&text));
    }
}

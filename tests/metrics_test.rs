//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use huginn::cache::{CacheConfig, ResponseCache, route_key};
use huginn::server::{AppState, build_router};
use huginn::{Credentials, ProxyConfig, telemetry};

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Sum counter values for a metric name carrying the given label value.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label && l.value() == value)
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cache_records_hits_and_misses() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let cache = ResponseCache::new(&CacheConfig::default());
                let key = route_key(&Method::GET, "/stats");
                cache.get(&key).await;
                cache
                    .insert(
                        key.clone(),
                        huginn::cache::CachedResponse {
                            body: "{}".into(),
                            content_type: None,
                        },
                    )
                    .await;
                cache.get(&key).await;
                cache.get(&key).await;
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 2);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::CACHE_HITS_TOTAL, "route", "GET /stats"),
        2
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn upstream_and_auth_outcomes_are_counted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/getArtists"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = ProxyConfig::new(server.uri(), Credentials::new("admin", "sesame"), "key");
    let app = build_router(AppState::from_config(&config).unwrap());

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let unauthorized = app
                    .clone()
                    .oneshot(Request::get("/artists").body(Body::empty()).unwrap())
                    .await
                    .unwrap();
                assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

                let degraded = app
                    .clone()
                    .oneshot(
                        Request::get("/artists")
                            .header("X-API-Key", "key")
                            .body(Body::empty())
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                assert_eq!(degraded.status(), StatusCode::OK);
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::AUTH_FAILURES_TOTAL), 1);
    assert_eq!(
        counter_with_label(
            &snapshot,
            telemetry::UPSTREAM_REQUESTS_TOTAL,
            "status",
            "error"
        ),
        1
    );
    assert_eq!(
        counter_with_label(
            &snapshot,
            telemetry::UPSTREAM_REQUESTS_TOTAL,
            "endpoint",
            "getArtists"
        ),
        1
    );
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let cache = ResponseCache::new(&CacheConfig::default());
    assert!(cache.get("GET /artists").await.is_none());
}

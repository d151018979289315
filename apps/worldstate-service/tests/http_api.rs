//! HTTP API Integration Tests
//!
//! Exercises the router end to end: mock upstream feed → cache → axum handlers.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use worldstate_service::infrastructure::server::{STALE_HEADER, WARNING_HEADER};
use worldstate_service::{
    EnrichmentService, FeedClientConfig, FetchOrchestrator, HttpFeedClient, HttpServer,
    HttpServerState, InMemoryLocalizationStore, SnapshotCache, init_metrics, router,
};

const FIXTURE: &str = include_str!("fixtures/worldstate.json");

fn cache_for(server: &MockServer, freshness: Duration) -> SnapshotCache {
    let client = HttpFeedClient::new(&FeedClientConfig {
        url: format!("{}/worldState.php", server.uri()),
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    let store = InMemoryLocalizationStore::new();
    store.insert("nodes", "v1", "SolNode309", "Oro Works (Zariman)");
    let enrichment = EnrichmentService::new(Arc::new(store), "v1");
    SnapshotCache::new(FetchOrchestrator::new(Arc::new(client), enrichment), freshness)
}

fn app(cache: SnapshotCache) -> Router {
    router(Arc::new(HttpServerState::new("it".to_string(), cache)))
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn snapshot_json_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FIXTURE, "application/json"))
        .mount(&server)
        .await;

    let app = app(cache_for(&server, Duration::from_secs(60)));
    let response = get(&app, "/worldstate").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(body["version"], 14);
    assert_eq!(body["server_time"], "2025-10-19T13:20:00Z");

    let alert = &body["alerts"][0];
    assert_eq!(alert["activation"], "2025-10-19T13:08:02.779Z");
    assert_eq!(alert["expiry"], "2025-10-19T15:07:04.219Z");
    assert_eq!(alert["mission"]["location"]["id"], "SolNode309");
    assert_eq!(alert["mission"]["location"]["display"], "Oro Works (Zariman)");

    assert_eq!(body["fissures"][0]["tier"], "Meso");
    assert_eq!(body["circuit"][1]["tier"], "Steel Path");
}

#[tokio::test]
async fn upstream_down_from_start_is_503() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let app = app(cache_for(&server, Duration::from_secs(60)));
    let response = get(&app, "/worldstate").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json(response).await["error"], "no_snapshot_available");

    let info = json(get(&app, "/cache-info").await).await;
    assert_eq!(info["state"], "empty");
}

#[tokio::test]
async fn upstream_outage_after_success_is_stale_serve() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FIXTURE, "application/json"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let app = app(cache_for(&server, Duration::from_millis(50)));
    assert_eq!(get(&app, "/worldstate").await.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(100)).await;

    let response = get(&app, "/worldstate").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[STALE_HEADER], "true");
    assert!(
        response.headers()[WARNING_HEADER]
            .to_str()
            .unwrap()
            .contains("503")
    );
    assert_eq!(json(response).await["version"], 14);
}

#[tokio::test]
async fn metrics_endpoint_renders_pipeline_counters() {
    init_metrics().unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FIXTURE, "application/json"))
        .mount(&server)
        .await;

    let app = app(cache_for(&server, Duration::from_secs(60)));
    get(&app, "/worldstate").await;

    let response = get(&app, "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("worldstate_fetch_total"));
    assert!(text.contains("worldstate_cache_reads_total"));
}

#[tokio::test]
async fn server_stops_on_cancel() {
    let server = MockServer::start().await;
    let cancel = CancellationToken::new();
    let http = HttpServer::new(
        0,
        Arc::new(HttpServerState::new(
            "it".to_string(),
            cache_for(&server, Duration::from_secs(60)),
        )),
        cancel.clone(),
    );

    let handle = tokio::spawn(http.run());
    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}

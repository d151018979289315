//! HTTP Surface
//!
//! Serves the cached snapshot, cache administration and health endpoints.
//!
//! # Endpoints
//!
//! - `GET /worldstate` - Current snapshot JSON (503 if none can be produced)
//! - `POST /cache/clear` - Drop the cached snapshot
//! - `GET /cache-info` - Cache state without triggering a fetch
//! - `GET /health` - Returns JSON health status
//! - `GET /healthz` - Kubernetes liveness probe (simple OK)
//! - `GET /readyz` - Kubernetes readiness probe (ready once a snapshot is cached)
//! - `GET /metrics` - Prometheus metrics in text format

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::application::services::{CacheError, CacheInfo, SnapshotCache, Staleness};
use crate::infrastructure::metrics::get_metrics_handle;

/// Set to `true` when the body is a previous snapshot served after a failed refetch.
pub const STALE_HEADER: HeaderName = HeaderName::from_static("x-snapshot-stale");

/// Why the refetch failed, present alongside [`STALE_HEADER`].
pub const WARNING_HEADER: HeaderName = HeaderName::from_static("x-snapshot-warning");

/// RFC 3339 fetch time of the served snapshot.
pub const FETCHED_AT_HEADER: HeaderName = HeaderName::from_static("x-snapshot-fetched-at");

// =============================================================================
// Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "degraded".
    pub status: HealthStatus,
    /// Service version.
    pub version: String,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
    /// Current time.
    pub current_time: DateTime<Utc>,
    /// Snapshot cache state.
    pub cache: CacheInfo,
}

/// Overall health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// A snapshot is cached.
    Healthy,
    /// Nothing cached yet; reads will hit the upstream feed.
    Degraded,
}

/// Error body for failed snapshot reads.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Stable error code.
    pub error: &'static str,
    /// Human-readable detail.
    pub message: String,
}

// =============================================================================
// Server State
// =============================================================================

/// Shared state for the HTTP server.
pub struct HttpServerState {
    version: String,
    started_at: Instant,
    cache: SnapshotCache,
}

impl HttpServerState {
    /// Create new server state.
    #[must_use]
    pub fn new(version: String, cache: SnapshotCache) -> Self {
        Self {
            version,
            started_at: Instant::now(),
            cache,
        }
    }
}

// =============================================================================
// HTTP Server
// =============================================================================

/// Build the service router.
#[must_use]
pub fn router(state: Arc<HttpServerState>) -> Router {
    Router::new()
        .route("/worldstate", get(worldstate_handler))
        .route("/cache/clear", post(clear_handler))
        .route("/cache-info", get(cache_info_handler))
        .route("/health", get(health_handler))
        .route("/healthz", get(liveness_handler))
        .route("/readyz", get(readiness_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Snapshot HTTP server.
pub struct HttpServer {
    port: u16,
    state: Arc<HttpServerState>,
    cancel: CancellationToken,
}

impl HttpServer {
    /// Create a new server.
    #[must_use]
    pub const fn new(port: u16, state: Arc<HttpServerState>, cancel: CancellationToken) -> Self {
        Self {
            port,
            state,
            cancel,
        }
    }

    /// Run the server until cancelled.
    ///
    /// # Errors
    ///
    /// Returns `HttpServerError` if binding fails or the HTTP server
    /// encounters a fatal error while running.
    pub async fn run(self) -> Result<(), HttpServerError> {
        let app = router(self.state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| HttpServerError::BindFailed(self.port, e.to_string()))?;

        tracing::info!(port = self.port, "HTTP server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(self.cancel.cancelled_owned())
            .await
            .map_err(|e| HttpServerError::ServerFailed(e.to_string()))?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

// =============================================================================
// HTTP Handlers
// =============================================================================

async fn worldstate_handler(State(state): State<Arc<HttpServerState>>) -> Response {
    match state.cache.read().await {
        Ok(read) => {
            let mut response = Json(read.snapshot.as_ref()).into_response();
            let headers = response.headers_mut();

            if let Ok(value) = HeaderValue::from_str(&read.fetched_at.to_rfc3339()) {
                headers.insert(FETCHED_AT_HEADER, value);
            }
            if let Staleness::Stale { warning } = &read.staleness {
                headers.insert(STALE_HEADER, HeaderValue::from_static("true"));
                if let Ok(value) = HeaderValue::from_str(&header_safe(warning)) {
                    headers.insert(WARNING_HEADER, value);
                }
            }
            response
        }
        Err(err @ CacheError::NoSnapshotAvailable { .. }) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorBody {
                error: "no_snapshot_available",
                message: err.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn clear_handler(State(state): State<Arc<HttpServerState>>) -> impl IntoResponse {
    state.cache.clear();
    (StatusCode::OK, Json(state.cache.info()))
}

async fn cache_info_handler(State(state): State<Arc<HttpServerState>>) -> impl IntoResponse {
    Json(state.cache.info())
}

async fn health_handler(State(state): State<Arc<HttpServerState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(build_health_response(&state)))
}

async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn readiness_handler(State(state): State<Arc<HttpServerState>>) -> impl IntoResponse {
    if state.cache.is_populated() {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}

async fn metrics_handler() -> impl IntoResponse {
    get_metrics_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain")],
                "Metrics not initialized".to_string(),
            )
        },
        |handle| {
            let body = handle.render();
            (
                StatusCode::OK,
                [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
                body,
            )
        },
    )
}

fn build_health_response(state: &HttpServerState) -> HealthResponse {
    let cache = state.cache.info();
    let status = if cache.version.is_some() {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    HealthResponse {
        status,
        version: state.version.clone(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        current_time: Utc::now(),
        cache,
    }
}

/// Header values must be visible ASCII.
fn header_safe(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '?' })
        .collect()
}

// =============================================================================
// Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    /// Failed to bind to port.
    #[error("failed to bind to port {0}: {1}")]
    BindFailed(u16, String),

    /// Server error.
    #[error("server error: {0}")]
    ServerFailed(String),
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::application::ports::{FeedSourcePort, FetchError};
    use crate::application::services::{EnrichmentService, FetchOrchestrator};
    use crate::infrastructure::localization::InMemoryLocalizationStore;

    /// Succeeds on the first call, fails with 503 afterwards.
    struct FlakyFeed {
        calls: AtomicUsize,
        succeed_first: bool,
    }

    #[async_trait]
    impl FeedSourcePort for FlakyFeed {
        async fn fetch(&self) -> Result<Value, FetchError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed_first && n == 0 {
                Ok(json!({ "Version": 7, "BuildLabel": "build/7" }))
            } else {
                Err(FetchError::Status { status: 503 })
            }
        }
    }

    fn app(succeed_first: bool, freshness: Duration) -> Router {
        let feed = FlakyFeed {
            calls: AtomicUsize::new(0),
            succeed_first,
        };
        let enrichment = EnrichmentService::new(Arc::new(InMemoryLocalizationStore::new()), "v1");
        let orchestrator = FetchOrchestrator::new(Arc::new(feed), enrichment);
        let cache = SnapshotCache::new(orchestrator, freshness);
        router(Arc::new(HttpServerState::new("test".to_string(), cache)))
    }

    async fn send(app: &Router, method: &str, uri: &str) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn worldstate_serves_snapshot() {
        let app = app(true, Duration::from_secs(60));

        let response = send(&app, "GET", "/worldstate").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(FETCHED_AT_HEADER));
        assert!(!response.headers().contains_key(STALE_HEADER));

        let body = body_json(response).await;
        assert_eq!(body["version"], 7);
        assert_eq!(body["build_label"], "build/7");
        assert_eq!(body["alerts"], json!([]));
    }

    #[tokio::test]
    async fn worldstate_unavailable_when_first_fetch_fails() {
        let app = app(false, Duration::from_secs(60));

        let response = send(&app, "GET", "/worldstate").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_json(response).await;
        assert_eq!(body["error"], "no_snapshot_available");
        assert!(body["message"].as_str().unwrap().contains("503"));
    }

    #[tokio::test(start_paused = true)]
    async fn worldstate_marks_stale_serve() {
        let app = app(true, Duration::from_secs(60));
        assert_eq!(send(&app, "GET", "/worldstate").await.status(), StatusCode::OK);

        tokio::time::advance(Duration::from_secs(61)).await;

        let response = send(&app, "GET", "/worldstate").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[STALE_HEADER], "true");
        assert!(
            response.headers()[WARNING_HEADER]
                .to_str()
                .unwrap()
                .contains("503")
        );
        assert_eq!(body_json(response).await["version"], 7);
    }

    #[tokio::test]
    async fn clear_empties_cache() {
        let app = app(true, Duration::from_secs(60));
        send(&app, "GET", "/worldstate").await;

        let info = body_json(send(&app, "GET", "/cache-info").await).await;
        assert_eq!(info["state"], "populated");
        assert_eq!(info["version"], 7);

        let response = send(&app, "POST", "/cache/clear").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["state"], "empty");

        // Upstream now fails and nothing is cached.
        let response = send(&app, "GET", "/worldstate").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn readiness_follows_cache() {
        let app = app(true, Duration::from_secs(60));
        assert_eq!(
            send(&app, "GET", "/readyz").await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );

        send(&app, "GET", "/worldstate").await;
        assert_eq!(send(&app, "GET", "/readyz").await.status(), StatusCode::OK);
        assert_eq!(send(&app, "GET", "/healthz").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_reports_cache_state() {
        let app = app(true, Duration::from_secs(60));

        let body = body_json(send(&app, "GET", "/health").await).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["cache"]["state"], "empty");

        send(&app, "GET", "/worldstate").await;
        let body = body_json(send(&app, "GET", "/health").await).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], "test");
    }

    #[test]
    fn header_safe_replaces_non_ascii() {
        assert_eq!(header_safe("fetch failed: ä\n"), "fetch failed: ??");
    }

    #[test]
    fn health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Degraded).unwrap(),
            "\"degraded\""
        );
    }
}

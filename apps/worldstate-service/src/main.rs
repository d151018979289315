//! Worldstate Service Binary
//!
//! Starts the world state cache and its HTTP surface.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin worldstate-service
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `LOCALIZATION_VERSION`: Reference-data version tag
//!
//! ## Optional
//! - `WORLDSTATE_URL`: Upstream feed URL (default: public world state endpoint)
//! - `WORLDSTATE_FRESHNESS_SECS`: Freshness window (default: 60)
//! - `WORLDSTATE_REQUEST_TIMEOUT_SECS`: Upstream request timeout (default: 20)
//! - `WORLDSTATE_HTTP_PORT`: HTTP port (default: 8083)
//! - `REDIS_URL`: Localization store; unset uses an empty in-memory store
//! - `OTEL_ENABLED`: Enable OpenTelemetry (default: true)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: <http://localhost:4317>)
//! - `OTEL_SERVICE_NAME`: Service name (default: worldstate-service)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use worldstate_service::application::ports::{FeedSourcePort, LocalizationPort};
use worldstate_service::infrastructure::telemetry;
use worldstate_service::{
    EnrichmentService, FetchOrchestrator, HttpFeedClient, HttpServer, HttpServerState,
    InMemoryLocalizationStore, RedisLocalizationStore, ServiceConfig, SnapshotCache, init_metrics,
};

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    // Initialize telemetry (OpenTelemetry + tracing)
    let _telemetry_guard = telemetry::init();

    tracing::info!("Starting Worldstate Service");

    // Initialize Prometheus metrics
    if let Err(e) = init_metrics() {
        tracing::warn!(error = %e, "Metrics recorder unavailable");
    }

    let config = ServiceConfig::from_env().context("invalid configuration")?;
    log_config(&config);

    let shutdown_token = CancellationToken::new();

    let store = localization_store(&config).await?;
    let enrichment = EnrichmentService::new(store, config.localization_version.clone());

    let feed: Arc<dyn FeedSourcePort> = Arc::new(
        HttpFeedClient::new(&config.feed.client_config()).context("failed to build feed client")?,
    );
    let orchestrator = FetchOrchestrator::new(feed, enrichment);
    let cache = SnapshotCache::new(orchestrator, config.feed.freshness);

    // Warm the cache; a failure here only means the first reader pays for the fetch
    match cache.read().await {
        Ok(read) => tracing::info!(
            version = read.snapshot.version(),
            records = read.snapshot.total_records(),
            "Snapshot cache warmed"
        ),
        Err(e) => tracing::warn!(error = %e, "Initial snapshot fetch failed"),
    }

    let server_state = Arc::new(HttpServerState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        cache,
    ));
    let server = HttpServer::new(
        config.server.http_port,
        server_state,
        shutdown_token.clone(),
    );

    let server_task = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            tracing::error!(error = %e, "HTTP server error");
        }
    });

    tracing::info!("Worldstate service ready");

    await_shutdown(shutdown_token).await;

    if tokio::time::timeout(SHUTDOWN_TIMEOUT, server_task)
        .await
        .is_err()
    {
        tracing::warn!("HTTP server did not stop within the shutdown timeout");
    }

    tracing::info!("Worldstate service stopped");
    Ok(())
}

/// Select the localization store backend.
async fn localization_store(config: &ServiceConfig) -> anyhow::Result<Arc<dyn LocalizationPort>> {
    match &config.redis_url {
        Some(url) => {
            let store = RedisLocalizationStore::connect(url)
                .await
                .context("failed to connect to localization store")?;
            tracing::info!("Using Redis localization store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!(
                "REDIS_URL not set, using an empty in-memory localization store; \
                 identifiers will be served unresolved"
            );
            Ok(Arc::new(InMemoryLocalizationStore::new()))
        }
    }
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        load_dotenv_from_ancestors();
    }
}

/// Log the parsed configuration.
fn log_config(config: &ServiceConfig) {
    tracing::info!(
        feed_url = %config.feed.url,
        freshness_secs = config.feed.freshness.as_secs(),
        request_timeout_secs = config.feed.request_timeout.as_secs(),
        localization_version = %config.localization_version,
        redis = config.redis_url.is_some(),
        http_port = config.server.http_port,
        "Configuration loaded"
    );
}

/// Load .env file from any ancestor directory.
fn load_dotenv_from_ancestors() {
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();

    tracing::info!(
        timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
        "Graceful shutdown started"
    );
}

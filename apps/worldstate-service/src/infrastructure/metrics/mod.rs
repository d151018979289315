//! Prometheus Metrics Module
//!
//! Installs the Prometheus recorder behind the pipeline metrics recorded in
//! [`crate::application::metrics`].
//!
//! # Metrics Categories
//!
//! - **Fetches**: Upstream retrieval outcomes and latency
//! - **Decoding**: Dropped categories
//! - **Cache**: How reads were satisfied
//! - **Localization**: Identifiers left unresolved
//!
//! # Integration
//!
//! Metrics are exposed at `/metrics` on the HTTP server port. Recording is
//! a no-op until [`init_metrics`] installs the recorder.

use std::sync::OnceLock;

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use crate::application::metrics::{
    CACHE_READS_TOTAL, DECODE_FAILURES_TOTAL, FETCH_DURATION_SECONDS, FETCH_TOTAL,
    LOCALIZATION_MISSES_TOTAL, SNAPSHOT_VERSION,
};

// =============================================================================
// Global Metrics Handle
// =============================================================================

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// Repeated calls return the handle installed by the first one.
///
/// # Errors
///
/// Returns [`BuildError`] if the global recorder cannot be installed.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics();
    Ok(PROMETHEUS_HANDLE.get_or_init(|| handle).clone())
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

// =============================================================================
// Metric Registration
// =============================================================================

fn register_metrics() {
    describe_counter!(
        FETCH_TOTAL,
        "Upstream feed fetch attempts by outcome"
    );
    describe_histogram!(
        FETCH_DURATION_SECONDS,
        "Time to fetch, decode and enrich one snapshot"
    );
    describe_counter!(
        DECODE_FAILURES_TOTAL,
        "Categories dropped from a snapshot because a record failed to decode"
    );
    describe_counter!(
        CACHE_READS_TOTAL,
        "Snapshot reads by how they were satisfied"
    );
    describe_counter!(
        LOCALIZATION_MISSES_TOTAL,
        "Identifiers that fell back to their raw value"
    );
    describe_gauge!(
        SNAPSHOT_VERSION,
        "Feed version of the cached snapshot"
    );
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_metrics().unwrap();
        let handle = init_metrics().unwrap();
        crate::application::metrics::record_cache_read(
            crate::application::metrics::CacheReadResult::Fresh,
        );

        assert!(get_metrics_handle().is_some());
        assert!(handle.render().contains(CACHE_READS_TOTAL));
    }
}

//! Pipeline metrics recording.
//!
//! Services record through the `metrics` facade only. Which recorder (if
//! any) receives the values is decided by the infrastructure layer; until
//! one is installed every call here is a no-op.

use std::time::Duration;

use metrics::{counter, gauge, histogram};

use crate::domain::worldstate::{Category, IdentifierKind};

/// Upstream fetch attempts by outcome.
pub const FETCH_TOTAL: &str = "worldstate_fetch_total";
/// Fetch, decode and enrich latency.
pub const FETCH_DURATION_SECONDS: &str = "worldstate_fetch_duration_seconds";
/// Dropped categories.
pub const DECODE_FAILURES_TOTAL: &str = "worldstate_decode_failures_total";
/// Reads by how they were satisfied.
pub const CACHE_READS_TOTAL: &str = "worldstate_cache_reads_total";
/// Identifiers left unresolved.
pub const LOCALIZATION_MISSES_TOTAL: &str = "worldstate_localization_misses_total";
/// Feed version of the cached snapshot.
pub const SNAPSHOT_VERSION: &str = "worldstate_snapshot_version";

/// How a snapshot read was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheReadResult {
    /// Served from cache within the freshness window.
    Fresh,
    /// A refetch succeeded.
    Refreshed,
    /// A refetch failed and the previous snapshot was served.
    Stale,
    /// A refetch failed with nothing cached.
    Unavailable,
}

impl CacheReadResult {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Refreshed => "refreshed",
            Self::Stale => "stale",
            Self::Unavailable => "unavailable",
        }
    }
}

/// Record a fetch attempt. `outcome` is `"success"` or a failure kind.
pub fn record_fetch(outcome: &'static str, duration: Duration) {
    counter!(FETCH_TOTAL, "outcome" => outcome).increment(1);
    histogram!(FETCH_DURATION_SECONDS).record(duration.as_secs_f64());
}

/// Record a dropped category.
pub fn record_decode_failure(category: Category) {
    counter!(DECODE_FAILURES_TOTAL, "category" => category.as_str()).increment(1);
}

/// Record how a read was satisfied.
pub fn record_cache_read(result: CacheReadResult) {
    counter!(CACHE_READS_TOTAL, "result" => result.as_str()).increment(1);
}

/// Record an identifier left unresolved.
pub fn record_localization_miss(kind: IdentifierKind) {
    counter!(LOCALIZATION_MISSES_TOTAL, "category" => kind.store_category()).increment(1);
}

/// Update the cached snapshot version.
#[allow(clippy::cast_precision_loss)]
pub fn set_snapshot_version(version: u64) {
    gauge!(SNAPSHOT_VERSION).set(version as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_read_result_as_str() {
        assert_eq!(CacheReadResult::Fresh.as_str(), "fresh");
        assert_eq!(CacheReadResult::Refreshed.as_str(), "refreshed");
        assert_eq!(CacheReadResult::Stale.as_str(), "stale");
        assert_eq!(CacheReadResult::Unavailable.as_str(), "unavailable");
    }

    #[test]
    fn recording_without_recorder_is_noop() {
        record_fetch("success", Duration::from_millis(5));
        record_decode_failure(Category::Alerts);
        record_cache_read(CacheReadResult::Fresh);
        record_localization_miss(IdentifierKind::Node);
        set_snapshot_version(3);
    }
}

//! Snapshot cache.
//!
//! Holds the most recent snapshot and decides when to refetch. Two states:
//! empty (nothing ever built, or just cleared) and populated.
//!
//! - Within the freshness window a read returns the cached snapshot.
//! - Outside it, or when empty, the read delegates to the orchestrator.
//! - A failed refetch while populated serves the previous snapshot with a
//!   warning. A failed fetch while empty is [`CacheError::NoSnapshotAvailable`].
//!
//! At most one upstream fetch is in flight. Readers arriving mid-fetch join
//! it and see the same outcome. The fetch runs on its own task and is never
//! cancelled by a reader going away. A fetch started after [`SnapshotCache::clear`]
//! queues behind the one it superseded instead of overlapping it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::time::Instant;

use crate::application::services::orchestrator::{FetchOrchestrator, OrchestratorError};
use crate::domain::worldstate::WorldStateSnapshot;
use crate::application::metrics::{self, CacheReadResult};

type FetchOutcome = Result<Arc<CacheEntry>, Arc<OrchestratorError>>;
type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;

/// Hard failure of a read.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// The cache is empty and the fetch failed.
    #[error("no snapshot available: {cause}")]
    NoSnapshotAvailable {
        /// Why the fetch failed.
        cause: Arc<OrchestratorError>,
    },
}

/// One cached snapshot with its fetch time.
#[derive(Debug)]
pub struct CacheEntry {
    snapshot: Arc<WorldStateSnapshot>,
    fetched_at: DateTime<Utc>,
    fetched_instant: Instant,
}

impl CacheEntry {
    fn new(snapshot: WorldStateSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            fetched_at: Utc::now(),
            fetched_instant: Instant::now(),
        }
    }

    /// Age of the entry.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.fetched_instant.elapsed()
    }
}

/// Whether a read was served fresh or stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    /// Within the freshness window, or just refetched.
    Fresh,
    /// A refetch failed; this is the previous snapshot.
    Stale {
        /// Why the refetch failed.
        warning: String,
    },
}

/// Result of a successful read.
#[derive(Debug, Clone)]
pub struct SnapshotRead {
    /// The snapshot.
    pub snapshot: Arc<WorldStateSnapshot>,
    /// When it was fetched.
    pub fetched_at: DateTime<Utc>,
    /// Fresh or stale.
    pub staleness: Staleness,
}

impl SnapshotRead {
    fn fresh(entry: &CacheEntry) -> Self {
        Self {
            snapshot: Arc::clone(&entry.snapshot),
            fetched_at: entry.fetched_at,
            staleness: Staleness::Fresh,
        }
    }

    fn stale(entry: &CacheEntry, cause: &OrchestratorError) -> Self {
        Self {
            snapshot: Arc::clone(&entry.snapshot),
            fetched_at: entry.fetched_at,
            staleness: Staleness::Stale {
                warning: cause.to_string(),
            },
        }
    }

    /// Whether this is a stale-serve.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self.staleness, Staleness::Stale { .. })
    }
}

/// Point-in-time description of the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheInfo {
    /// `"empty"` or `"populated"`.
    pub state: &'static str,
    /// Fetch time of the cached snapshot.
    pub fetched_at: Option<DateTime<Utc>>,
    /// Age in whole seconds.
    pub age_secs: Option<u64>,
    /// Cached feed version.
    pub version: Option<u64>,
    /// Whether a fetch is in flight.
    pub refreshing: bool,
    /// Freshness window in seconds.
    pub freshness_secs: u64,
}

struct InFlight {
    id: u64,
    generation: u64,
    fetch: SharedFetch,
}

struct Inner {
    orchestrator: FetchOrchestrator,
    freshness: Duration,
    entry: RwLock<Option<Arc<CacheEntry>>>,
    in_flight: Mutex<Option<InFlight>>,
    /// Bumped by `clear`; fetches started under an older generation do not
    /// install their result.
    generation: AtomicU64,
    next_fetch_id: AtomicU64,
}

/// Process-wide snapshot cache. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SnapshotCache {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SnapshotCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotCache")
            .field("freshness", &self.inner.freshness)
            .field("populated", &self.is_populated())
            .finish_non_exhaustive()
    }
}

impl SnapshotCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new(orchestrator: FetchOrchestrator, freshness: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                orchestrator,
                freshness,
                entry: RwLock::new(None),
                in_flight: Mutex::new(None),
                generation: AtomicU64::new(0),
                next_fetch_id: AtomicU64::new(0),
            }),
        }
    }

    /// Freshness window.
    #[must_use]
    pub fn freshness(&self) -> Duration {
        self.inner.freshness
    }

    /// Whether a snapshot is cached.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.inner.entry.read().is_some()
    }

    /// Return the current snapshot, refetching if the cached one is older
    /// than the freshness window.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NoSnapshotAvailable`] if nothing is cached and
    /// the fetch fails.
    pub async fn read(&self) -> Result<SnapshotRead, CacheError> {
        if let Some(entry) = self.inner.fresh_entry() {
            metrics::record_cache_read(CacheReadResult::Fresh);
            return Ok(SnapshotRead::fresh(&entry));
        }

        let fetch = match self.join_or_start_fetch() {
            Ok(fetch) => fetch,
            Err(entry) => {
                metrics::record_cache_read(CacheReadResult::Fresh);
                return Ok(SnapshotRead::fresh(&entry));
            }
        };

        match fetch.await {
            Ok(entry) => {
                metrics::record_cache_read(CacheReadResult::Refreshed);
                Ok(SnapshotRead::fresh(&entry))
            }
            Err(cause) => {
                let previous = self.inner.entry.read().clone();
                if let Some(entry) = previous {
                    metrics::record_cache_read(CacheReadResult::Stale);
                    tracing::warn!(
                        error = %cause,
                        age_secs = entry.age().as_secs(),
                        version = entry.snapshot.version(),
                        "Refresh failed, serving stale snapshot"
                    );
                    Ok(SnapshotRead::stale(&entry, &cause))
                } else {
                    metrics::record_cache_read(CacheReadResult::Unavailable);
                    tracing::error!(error = %cause, "Fetch failed with no cached snapshot");
                    Err(CacheError::NoSnapshotAvailable { cause })
                }
            }
        }
    }

    /// Reset to empty so the next read refetches unconditionally.
    ///
    /// A fetch already in flight still completes for the readers waiting on
    /// it, but its result is not cached. The next read's fetch starts once
    /// that one has finished.
    pub fn clear(&self) {
        let slot = self.inner.in_flight.lock();
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        let had_entry = self.inner.entry.write().take().is_some();
        let superseded_fetch = slot.is_some();
        drop(slot);

        tracing::info!(had_entry, superseded_fetch, "Snapshot cache cleared");
    }

    /// Describe the cache without triggering a fetch.
    #[must_use]
    pub fn info(&self) -> CacheInfo {
        let entry = self.inner.entry.read().clone();
        CacheInfo {
            state: if entry.is_some() { "populated" } else { "empty" },
            fetched_at: entry.as_ref().map(|e| e.fetched_at),
            age_secs: entry.as_ref().map(|e| e.age().as_secs()),
            version: entry.as_ref().map(|e| e.snapshot.version()),
            refreshing: self.inner.in_flight.lock().is_some(),
            freshness_secs: self.inner.freshness.as_secs(),
        }
    }

    /// Join the in-flight fetch or start one. Returns `Err(entry)` if
    /// another reader refreshed the cache in the meantime.
    ///
    /// A fetch from before the last `clear` is not joined; the new fetch
    /// waits for it to finish before going upstream.
    fn join_or_start_fetch(&self) -> Result<SharedFetch, Arc<CacheEntry>> {
        let mut slot = self.inner.in_flight.lock();
        let generation = self.inner.generation.load(Ordering::SeqCst);

        let superseded = match slot.as_ref() {
            Some(current) if current.generation == generation => {
                return Ok(current.fetch.clone());
            }
            Some(current) => Some(current.fetch.clone()),
            None => None,
        };
        if let Some(entry) = self.inner.fresh_entry() {
            return Err(entry);
        }

        let id = self.inner.next_fetch_id.fetch_add(1, Ordering::SeqCst);
        let inner = Arc::clone(&self.inner);

        tracing::debug!(
            fetch_id = id,
            queued = superseded.is_some(),
            "Starting snapshot fetch"
        );
        let task = tokio::spawn(async move {
            if let Some(previous) = superseded {
                // Outcome belongs to the readers of the superseded fetch.
                let _ = previous.await;
            }
            let result = inner.orchestrator.fetch_snapshot().await;
            inner.complete(id, generation, result)
        });

        let fetch = async move {
            task.await.unwrap_or_else(|e| {
                Err(Arc::new(OrchestratorError::Interrupted {
                    message: e.to_string(),
                }))
            })
        }
        .boxed()
        .shared();

        *slot = Some(InFlight {
            id,
            generation,
            fetch: fetch.clone(),
        });
        Ok(fetch)
    }
}

impl Inner {
    fn fresh_entry(&self) -> Option<Arc<CacheEntry>> {
        self.entry
            .read()
            .as_ref()
            .filter(|e| e.age() < self.freshness)
            .cloned()
    }

    /// Install a finished fetch and free the in-flight slot.
    fn complete(
        &self,
        id: u64,
        generation: u64,
        result: Result<WorldStateSnapshot, OrchestratorError>,
    ) -> FetchOutcome {
        let mut slot = self.in_flight.lock();

        let outcome = match result {
            Ok(snapshot) => {
                let entry = Arc::new(CacheEntry::new(snapshot));
                if self.generation.load(Ordering::SeqCst) == generation {
                    *self.entry.write() = Some(Arc::clone(&entry));
                    metrics::set_snapshot_version(entry.snapshot.version());
                } else {
                    tracing::debug!(fetch_id = id, "Cache cleared during fetch, result not cached");
                }
                Ok(entry)
            }
            Err(e) => Err(Arc::new(e)),
        };

        if slot.as_ref().is_some_and(|current| current.id == id) {
            *slot = None;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{FeedSourcePort, FetchError};
    use crate::application::services::enrichment::EnrichmentService;
    use crate::infrastructure::localization::InMemoryLocalizationStore;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;

    const FRESHNESS: Duration = Duration::from_secs(60);

    /// Scripted feed source that counts calls, tracks how many overlap, and
    /// takes a fixed time per fetch.
    struct ScriptedFeed {
        calls: AtomicUsize,
        active: AtomicUsize,
        max_active: AtomicUsize,
        latency: Duration,
        script: Mutex<VecDeque<Result<Value, FetchError>>>,
    }

    impl ScriptedFeed {
        fn new(latency: Duration, script: Vec<Result<Value, FetchError>>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                active: AtomicUsize::new(0),
                max_active: AtomicUsize::new(0),
                latency,
                script: Mutex::new(script.into()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn max_active(&self) -> usize {
            self.max_active.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FeedSourcePort for ScriptedFeed {
        async fn fetch(&self) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(active, Ordering::SeqCst);
            tokio::time::sleep(self.latency).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            self.script
                .lock()
                .pop_front()
                .unwrap_or(Err(FetchError::Network {
                    message: "script exhausted".into(),
                }))
        }
    }

    fn doc(version: u64) -> Result<Value, FetchError> {
        Ok(json!({ "Version": version, "BuildLabel": "2025.10.14.12.01/abc" }))
    }

    /// Header decodes, every category is the wrong shape.
    fn unreadable(version: u64) -> Result<Value, FetchError> {
        Ok(json!({
            "Version": version,
            "BuildLabel": "2025.10.14.12.01/abc",
            "ActiveMissions": "oops",
            "Alerts": 3,
            "VoidTraders": {}
        }))
    }

    fn with_trader(version: u64) -> Result<Value, FetchError> {
        Ok(json!({
            "Version": version,
            "BuildLabel": "2025.10.14.12.01/abc",
            "VoidTraders": [{
                "Activation": { "$date": { "$numberLong": "1761307200000" } },
                "Expiry": { "$date": { "$numberLong": "1761480000000" } },
                "Character": "Baro'Ki Teel",
                "Node": "PlutoHUB"
            }]
        }))
    }

    fn down() -> Result<Value, FetchError> {
        Err(FetchError::Status { status: 503 })
    }

    fn cache(feed: &Arc<ScriptedFeed>) -> SnapshotCache {
        let enrichment = EnrichmentService::new(Arc::new(InMemoryLocalizationStore::new()), "v1");
        let orchestrator =
            FetchOrchestrator::new(Arc::clone(feed) as Arc<dyn FeedSourcePort>, enrichment);
        SnapshotCache::new(orchestrator, FRESHNESS)
    }

    #[tokio::test(start_paused = true)]
    async fn reads_within_window_do_not_refetch() {
        let feed = ScriptedFeed::new(Duration::ZERO, vec![doc(1), doc(2)]);
        let cache = cache(&feed);

        let first = cache.read().await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;
        let second = cache.read().await.unwrap();

        assert_eq!(feed.calls(), 1);
        assert_eq!(first.snapshot.version(), 1);
        assert_eq!(second.snapshot.version(), 1);
        assert_eq!(second.staleness, Staleness::Fresh);
    }

    #[tokio::test(start_paused = true)]
    async fn read_after_window_refetches() {
        let feed = ScriptedFeed::new(Duration::ZERO, vec![doc(1), doc(2)]);
        let cache = cache(&feed);

        cache.read().await.unwrap();
        tokio::time::advance(FRESHNESS).await;
        let read = cache.read().await.unwrap();

        assert_eq!(feed.calls(), 2);
        assert_eq!(read.snapshot.version(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_serves_stale_snapshot() {
        let feed = ScriptedFeed::new(Duration::ZERO, vec![doc(7), down()]);
        let cache = cache(&feed);

        let before = cache.read().await.unwrap();
        tokio::time::advance(FRESHNESS + Duration::from_secs(1)).await;
        let after = cache.read().await.unwrap();

        assert_eq!(after.snapshot.version(), before.snapshot.version());
        assert!(after.is_stale());
        assert_eq!(after.fetched_at, before.fetched_at);
        match after.staleness {
            Staleness::Stale { warning } => assert!(warning.contains("503"), "{warning}"),
            Staleness::Fresh => panic!("expected stale read"),
        }
        assert!(cache.is_populated());
    }

    #[tokio::test(start_paused = true)]
    async fn first_fetch_failure_is_no_snapshot_available() {
        let feed = ScriptedFeed::new(Duration::ZERO, vec![down()]);
        let cache = cache(&feed);

        let err = cache.read().await.unwrap_err();
        let CacheError::NoSnapshotAvailable { cause } = err;
        assert!(matches!(
            *cause,
            OrchestratorError::Fetch(FetchError::Status { status: 503 })
        ));
        assert!(!cache.is_populated());
    }

    #[tokio::test(start_paused = true)]
    async fn document_failure_while_empty_is_no_snapshot_available() {
        let feed = ScriptedFeed::new(Duration::ZERO, vec![Ok(json!({ "Version": 3 }))]);
        let cache = cache(&feed);

        let err = cache.read().await.unwrap_err();
        let CacheError::NoSnapshotAvailable { cause } = err;
        assert!(matches!(*cause, OrchestratorError::Document(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn unreadable_document_keeps_previous_snapshot() {
        let feed = ScriptedFeed::new(Duration::ZERO, vec![with_trader(5), unreadable(6)]);
        let cache = cache(&feed);

        cache.read().await.unwrap();
        tokio::time::advance(FRESHNESS + Duration::from_secs(1)).await;
        let read = cache.read().await.unwrap();

        assert_eq!(read.snapshot.version(), 5);
        assert_eq!(read.snapshot.void_traders.len(), 1);
        assert!(read.is_stale());
        assert_eq!(cache.info().version, Some(5));
    }

    #[tokio::test(start_paused = true)]
    async fn unreadable_document_while_empty_is_no_snapshot_available() {
        let feed = ScriptedFeed::new(Duration::ZERO, vec![unreadable(6)]);
        let cache = cache(&feed);

        let CacheError::NoSnapshotAvailable { cause } = cache.read().await.unwrap_err();
        assert!(matches!(
            &*cause,
            OrchestratorError::AllCategoriesFailed { errors } if errors.len() == 3
        ));
        assert!(!cache.is_populated());
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_empty_failure() {
        let feed = ScriptedFeed::new(Duration::ZERO, vec![down(), doc(4)]);
        let cache = cache(&feed);

        assert!(cache.read().await.is_err());
        let read = cache.read().await.unwrap();
        assert_eq!(read.snapshot.version(), 4);
        assert_eq!(feed.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_reads_share_one_fetch() {
        let feed = ScriptedFeed::new(Duration::from_secs(2), vec![doc(9), doc(10)]);
        let cache = cache(&feed);

        let reads = futures::future::join_all((0..16).map(|_| {
            let cache = cache.clone();
            async move { cache.read().await }
        }))
        .await;

        assert_eq!(feed.calls(), 1);
        for read in reads {
            assert_eq!(read.unwrap().snapshot.version(), 9);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_readers_share_one_failure() {
        let feed = ScriptedFeed::new(Duration::from_secs(2), vec![down(), doc(1)]);
        let cache = cache(&feed);

        let reads = futures::future::join_all((0..8).map(|_| {
            let cache = cache.clone();
            async move { cache.read().await }
        }))
        .await;

        assert_eq!(feed.calls(), 1);
        assert!(reads.iter().all(Result::is_err));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_reader_does_not_cancel_fetch() {
        let feed = ScriptedFeed::new(Duration::from_secs(5), vec![doc(11)]);
        let cache = cache(&feed);

        let abandoned = tokio::time::timeout(Duration::from_secs(1), cache.read()).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(cache.is_populated());
        let read = cache.read().await.unwrap();
        assert_eq!(read.snapshot.version(), 11);
        assert_eq!(feed.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_forces_refetch() {
        let feed = ScriptedFeed::new(Duration::ZERO, vec![doc(1), doc(2)]);
        let cache = cache(&feed);

        cache.read().await.unwrap();
        cache.clear();
        assert!(!cache.is_populated());
        assert_eq!(cache.info().state, "empty");

        let read = cache.read().await.unwrap();
        assert_eq!(read.snapshot.version(), 2);
        assert_eq!(feed.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_after_failed_refresh_surfaces_hard_failure() {
        let feed = ScriptedFeed::new(Duration::ZERO, vec![doc(1), down()]);
        let cache = cache(&feed);

        cache.read().await.unwrap();
        cache.clear();
        assert!(matches!(
            cache.read().await,
            Err(CacheError::NoSnapshotAvailable { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn clear_during_fetch_discards_its_result() {
        let feed = ScriptedFeed::new(Duration::from_secs(2), vec![doc(1), doc(2)]);
        let cache = cache(&feed);

        let reader = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.read().await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        cache.clear();

        let first = reader.await.unwrap().unwrap();
        assert_eq!(first.snapshot.version(), 1);
        assert!(!cache.is_populated());

        let second = cache.read().await.unwrap();
        assert_eq!(second.snapshot.version(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn read_after_clear_waits_for_superseded_fetch() {
        let feed = ScriptedFeed::new(Duration::from_secs(2), vec![doc(1), doc(2)]);
        let cache = cache(&feed);

        let first = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.read().await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        cache.clear();

        let started = Instant::now();
        let second = cache.read().await.unwrap();

        assert_eq!(second.snapshot.version(), 2);
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert_eq!(first.await.unwrap().unwrap().snapshot.version(), 1);
        assert_eq!(feed.calls(), 2);
        assert_eq!(feed.max_active(), 1);
        assert_eq!(cache.info().version, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn readers_after_clear_share_the_queued_fetch() {
        let feed = ScriptedFeed::new(Duration::from_secs(2), vec![doc(1), doc(2), doc(3)]);
        let cache = cache(&feed);

        let first = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.read().await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        cache.clear();

        let reads = futures::future::join_all((0..4).map(|_| {
            let cache = cache.clone();
            async move { cache.read().await }
        }))
        .await;

        first.await.unwrap().unwrap();
        for read in reads {
            assert_eq!(read.unwrap().snapshot.version(), 2);
        }
        assert_eq!(feed.calls(), 2);
        assert_eq!(feed.max_active(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn info_reports_populated_state() {
        let feed = ScriptedFeed::new(Duration::ZERO, vec![doc(5)]);
        let cache = cache(&feed);

        let empty = cache.info();
        assert_eq!(empty.state, "empty");
        assert_eq!(empty.version, None);
        assert_eq!(empty.freshness_secs, 60);

        cache.read().await.unwrap();
        tokio::time::advance(Duration::from_secs(12)).await;

        let info = cache.info();
        assert_eq!(info.state, "populated");
        assert_eq!(info.version, Some(5));
        assert_eq!(info.age_secs, Some(12));
        assert!(!info.refreshing);
    }
}

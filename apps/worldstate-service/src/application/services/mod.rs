//! Application Services
//!
//! The ingestion pipeline, leaves first:
//!
//! - `decoder`: raw feed document to typed records
//! - `enrichment`: typed records to localized records
//! - `orchestrator`: fetch, decode and enrich one snapshot
//! - `snapshot_cache`: freshness, stale-serve and single-flight policy

pub mod decoder;
pub mod enrichment;
pub mod orchestrator;
pub mod snapshot_cache;

pub use decoder::{DecodeCause, DecodeError, DecodeReport, DocumentError, decode};
pub use enrichment::EnrichmentService;
pub use orchestrator::{FetchOrchestrator, OrchestratorError};
pub use snapshot_cache::{CacheError, CacheInfo, SnapshotCache, SnapshotRead, Staleness};

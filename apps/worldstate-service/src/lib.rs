#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::float_cmp
    )
)]

//! Worldstate Service - Live Game State Cache
//!
//! Pulls the upstream world state feed, decodes each category into typed
//! records, resolves internal identifiers to display names and keeps the
//! latest snapshot cached for many concurrent readers.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Pure world state types
//!   - `feed_date`: Feed timestamp normalization
//!   - `worldstate`: Categories, raw records, enriched records, snapshots
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: Interfaces for the upstream feed and localization store
//!   - `services`: Decoder, enrichment, fetch orchestrator, snapshot cache
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `feed`: reqwest client for the upstream feed
//!   - `localization`: In-memory and Redis localization stores
//!   - `config`: Environment configuration
//!   - `server`: Snapshot API and health endpoints
//!
//! # Data Flow
//!
//! ```text
//!                ┌──────────┐   ┌─────────┐   ┌────────────┐   ┌──────────┐
//! Upstream ─────►│  Fetch   │──►│ Decoder │──►│ Enrichment │──►│ Snapshot │──► Reader 1
//! feed (JSON)    │          │   │         │   │            │   │  Cache   │──► Reader 2
//!                └──────────┘   └─────────┘   └─────┬──────┘   └──────────┘──► Reader N
//!                                                   │
//!                                            Localization store
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - World state types with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::feed_date::{FeedDateError, FeedInstant};
pub use domain::worldstate::{
    Category, DecodedWorldState, IdentifierKind, SnapshotHeader, WorldStateSnapshot,
};

// Ports
pub use application::ports::{FeedSourcePort, FetchError, LocalizationError, LocalizationPort};

// Services
pub use application::services::{
    CacheError, CacheInfo, DecodeCause, DecodeError, DecodeReport, DocumentError,
    EnrichmentService, FetchOrchestrator, OrchestratorError, SnapshotCache, SnapshotRead,
    Staleness, decode,
};

// Infrastructure config
pub use infrastructure::config::{ConfigError, FeedSettings, ServerSettings, ServiceConfig};

// Adapters
pub use infrastructure::feed::{FeedClientConfig, HttpFeedClient};
pub use infrastructure::localization::{InMemoryLocalizationStore, RedisLocalizationStore};

// HTTP server
pub use infrastructure::server::{HttpServer, HttpServerError, HttpServerState, router};

// Metrics
pub use infrastructure::metrics::init_metrics;

// Telemetry
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};

//! Fetch orchestrator.
//!
//! One cycle: fetch the raw document, decode it, log dropped categories,
//! enrich. Never retries; the snapshot cache owns that policy.

use std::sync::Arc;
use std::time::Instant;

use crate::application::ports::{FeedSourcePort, FetchError};
use crate::application::services::decoder::{self, DecodeError, DocumentError};
use crate::application::services::enrichment::EnrichmentService;
use crate::domain::worldstate::WorldStateSnapshot;
use crate::application::metrics;

/// A fetch cycle that produced no snapshot.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OrchestratorError {
    /// The feed could not be retrieved.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The feed document header is unusable.
    #[error("feed document rejected: {0}")]
    Document(#[from] DocumentError),

    /// Every category that carried data failed to decode.
    #[error("every category failed to decode ({} dropped)", .errors.len())]
    AllCategoriesFailed {
        /// One entry per dropped category.
        errors: Vec<DecodeError>,
    },

    /// The fetch task ended without producing a result.
    #[error("fetch interrupted: {message}")]
    Interrupted {
        /// Error details.
        message: String,
    },
}

impl OrchestratorError {
    /// Short label for metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(e) => e.kind(),
            Self::Document(_) => "document",
            Self::AllCategoriesFailed { .. } => "all_categories_failed",
            Self::Interrupted { .. } => "interrupted",
        }
    }
}

/// Runs fetch, decode and enrichment for one snapshot.
#[derive(Clone)]
pub struct FetchOrchestrator {
    source: Arc<dyn FeedSourcePort>,
    enrichment: EnrichmentService,
}

impl std::fmt::Debug for FetchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchOrchestrator")
            .field("enrichment", &self.enrichment)
            .finish_non_exhaustive()
    }
}

impl FetchOrchestrator {
    /// Create an orchestrator.
    #[must_use]
    pub fn new(source: Arc<dyn FeedSourcePort>, enrichment: EnrichmentService) -> Self {
        Self { source, enrichment }
    }

    /// Produce a new snapshot from the upstream feed.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError`] if the feed cannot be fetched, its
    /// header cannot be decoded, or every category in it was dropped. Some
    /// dropped categories alongside decoded ones are not errors.
    pub async fn fetch_snapshot(&self) -> Result<WorldStateSnapshot, OrchestratorError> {
        let started = Instant::now();
        let result = self.run().await;
        let elapsed = started.elapsed();

        match &result {
            Ok(snapshot) => {
                metrics::record_fetch("success", elapsed);
                tracing::info!(
                    version = snapshot.version(),
                    build_label = %snapshot.header.build_label,
                    records = snapshot.total_records(),
                    duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                    "Snapshot built"
                );
            }
            Err(e) => {
                metrics::record_fetch(e.kind(), elapsed);
                tracing::warn!(error = %e, "Snapshot build failed");
            }
        }

        result
    }

    async fn run(&self) -> Result<WorldStateSnapshot, OrchestratorError> {
        let document = self.source.fetch().await?;
        let report = decoder::decode(&document)?;

        for err in &report.errors {
            metrics::record_decode_failure(err.category);
            tracing::warn!(
                category = %err.category,
                index = ?err.index,
                cause = %err.cause,
                "Category dropped from snapshot"
            );
        }

        if report.is_total_failure() {
            return Err(OrchestratorError::AllCategoriesFailed {
                errors: report.errors,
            });
        }

        Ok(self.enrichment.enrich(&report.state).await)
    }
}

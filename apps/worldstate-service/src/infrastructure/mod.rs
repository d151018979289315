//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port interfaces
//! defined in the application layer, plus the process-level concerns
//! around them.

/// Configuration loaded from environment variables.
pub mod config;

/// HTTP client for the upstream world state feed.
pub mod feed;

/// Localization store adapters (in-memory, Redis).
pub mod localization;

/// Prometheus recorder and render handle.
pub mod metrics;

/// Snapshot API and health endpoints.
pub mod server;

/// OpenTelemetry tracing integration.
pub mod telemetry;

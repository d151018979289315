//! Application Layer
//!
//! Ports for the upstream feed and localization store, the services
//! that turn a raw feed document into a cached snapshot, and the metrics
//! those services record.

pub mod metrics;
pub mod ports;
pub mod services;

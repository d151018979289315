//! Configuration Module
//!
//! Environment-driven configuration for the world state service.

mod settings;

pub use settings::{
    ConfigError, DEFAULT_WORLDSTATE_URL, FeedSettings, ServerSettings, ServiceConfig,
};

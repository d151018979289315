//! Service Configuration Settings
//!
//! Configuration types for the world state service, loaded from environment
//! variables.

use std::time::Duration;

use crate::infrastructure::feed::FeedClientConfig;

/// Public world state endpoint.
pub const DEFAULT_WORLDSTATE_URL: &str = "https://api.warframe.com/cdn/worldState.php";

/// Upstream feed and cache settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSettings {
    /// Upstream feed URL.
    pub url: String,
    /// How long a cached snapshot is served without refetching.
    pub freshness: Duration,
    /// HTTP client timeout for one fetch.
    pub request_timeout: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_WORLDSTATE_URL.to_string(),
            freshness: Duration::from_secs(60),
            request_timeout: Duration::from_secs(20),
        }
    }
}

impl FeedSettings {
    /// Client settings for the HTTP feed adapter.
    #[must_use]
    pub fn client_config(&self) -> FeedClientConfig {
        FeedClientConfig {
            url: self.url.clone(),
            timeout: self.request_timeout,
        }
    }
}

/// HTTP surface settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerSettings {
    /// Port for the snapshot and health endpoints.
    pub http_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { http_port: 8083 }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Feed and cache settings.
    pub feed: FeedSettings,
    /// Reference-data version tag used for every localization lookup.
    pub localization_version: String,
    /// Redis URL for the localization store. `None` selects the in-memory store.
    pub redis_url: Option<String>,
    /// HTTP surface settings.
    pub server: ServerSettings,
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `LOCALIZATION_VERSION` is missing or empty, or if
    /// the freshness window is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`ServiceConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let localization_version = lookup("LOCALIZATION_VERSION")
            .ok_or_else(|| ConfigError::MissingEnvVar("LOCALIZATION_VERSION".to_string()))?;

        if localization_version.trim().is_empty() {
            return Err(ConfigError::EmptyValue("LOCALIZATION_VERSION".to_string()));
        }

        let defaults = FeedSettings::default();

        let url = lookup("WORLDSTATE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.url);

        let freshness = parse_duration_secs(
            lookup("WORLDSTATE_FRESHNESS_SECS"),
            defaults.freshness,
        );
        if freshness.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "WORLDSTATE_FRESHNESS_SECS".to_string(),
                reason: "freshness window must be greater than zero".to_string(),
            });
        }

        let request_timeout = parse_duration_secs(
            lookup("WORLDSTATE_REQUEST_TIMEOUT_SECS"),
            defaults.request_timeout,
        );

        let redis_url = lookup("REDIS_URL").filter(|v| !v.trim().is_empty());

        let server = ServerSettings {
            http_port: parse_u16(
                lookup("WORLDSTATE_HTTP_PORT"),
                ServerSettings::default().http_port,
            ),
        };

        Ok(Self {
            feed: FeedSettings {
                url,
                freshness,
                request_timeout,
            },
            localization_version,
            redis_url,
            server,
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    /// Environment variable parsed but is not acceptable.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

fn parse_u16(value: Option<String>, default: u16) -> u16 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn parse_duration_secs(value: Option<String>, default: Duration) -> Duration {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}

//! Feed Source Port (Driven Port)
//!
//! Interface for retrieving the raw world state document.

use async_trait::async_trait;
use serde_json::Value;

/// Failure to retrieve the raw feed document.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("network error: {message}")]
    Network {
        /// Error details.
        message: String,
    },

    /// Upstream answered with a non-success status.
    #[error("upstream returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Response body is not valid JSON.
    #[error("invalid JSON body: {message}")]
    InvalidJson {
        /// Parser message.
        message: String,
    },

    /// Response body is JSON but not an object.
    #[error("feed document root is not a JSON object")]
    NotAnObject,

    /// HTTP client could not be constructed.
    #[error("client error: {message}")]
    Client {
        /// Error details.
        message: String,
    },
}

impl FetchError {
    /// Short label for metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Status { .. } => "status",
            Self::InvalidJson { .. } => "invalid_json",
            Self::NotAnObject => "not_an_object",
            Self::Client { .. } => "client",
        }
    }
}

/// Port for retrieving the upstream feed.
///
/// One call performs exactly one retrieval. Implementations never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedSourcePort: Send + Sync {
    /// Fetch the current raw feed document.
    async fn fetch(&self) -> Result<Value, FetchError>;
}

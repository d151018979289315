//! HTTP client for the upstream world state feed.
//!
//! One `GET` per fetch, no retries. Retry policy belongs to the snapshot
//! cache, which decides what callers see when a fetch fails.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::application::ports::{FeedSourcePort, FetchError};

const USER_AGENT: &str = concat!("worldstate-service/", env!("CARGO_PKG_VERSION"));

/// Feed client configuration.
#[derive(Debug, Clone)]
pub struct FeedClientConfig {
    /// Feed URL.
    pub url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

/// reqwest-backed [`FeedSourcePort`].
#[derive(Debug, Clone)]
pub struct HttpFeedClient {
    client: Client,
    url: String,
}

impl HttpFeedClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the underlying client cannot be
    /// built.
    pub fn new(config: &FeedClientConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Client {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Configured feed URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSourcePort for HttpFeedClient {
    async fn fetch(&self) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %self.url, "Feed request rejected");
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Network {
            message: e.to_string(),
        })?;

        let document: Value =
            serde_json::from_slice(&body).map_err(|e| FetchError::InvalidJson {
                message: e.to_string(),
            })?;

        if !document.is_object() {
            return Err(FetchError::NotAnObject);
        }

        tracing::debug!(bytes = body.len(), "Feed document received");
        Ok(document)
    }
}

//! Upstream feed adapter.

mod http_client;

pub use http_client::{FeedClientConfig, HttpFeedClient};

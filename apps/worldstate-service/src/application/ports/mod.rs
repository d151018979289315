//! Application Ports (Driven)
//!
//! Ports define the interfaces the pipeline uses to reach external systems:
//! the upstream feed and the localization store.

mod feed_source_port;
mod localization_port;

pub use feed_source_port::{FeedSourcePort, FetchError};
pub use localization_port::{LocalizationError, LocalizationPort};

#[cfg(test)]
pub use feed_source_port::MockFeedSourcePort;
#[cfg(test)]
pub use localization_port::MockLocalizationPort;

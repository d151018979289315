//! Localization Port (Driven Port)
//!
//! Read-only access to the localization store populated by the external
//! reference-data loader. Entries are keyed by identifier, store category
//! and reference-data version so two live versions never collide.

use async_trait::async_trait;

/// Localization store backend failure.
///
/// Callers degrade every variant to a miss.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LocalizationError {
    /// Store is unreachable.
    #[error("localization store unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Store answered with something other than a string.
    #[error("localization store returned an unexpected value: {message}")]
    UnexpectedValue {
        /// Error details.
        message: String,
    },
}

/// Port for localization lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocalizationPort: Send + Sync {
    /// Look up the display string for `identifier` in `category` at
    /// `version`. `Ok(None)` is a miss.
    async fn get(
        &self,
        identifier: &str,
        category: &str,
        version: &str,
    ) -> Result<Option<String>, LocalizationError>;
}

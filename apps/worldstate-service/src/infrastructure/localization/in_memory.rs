//! In-memory localization store.
//!
//! Used when no Redis URL is configured and throughout the tests. Entries
//! are grouped per `(category, version)` table, the same layout the Redis
//! adapter reads.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::application::ports::{LocalizationError, LocalizationPort};

type Table = HashMap<String, String>;

/// Thread-safe in-memory localization store.
#[derive(Debug, Default)]
pub struct InMemoryLocalizationStore {
    tables: RwLock<HashMap<(String, String), Table>>,
}

impl InMemoryLocalizationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace one entry.
    pub fn insert(
        &self,
        category: impl Into<String>,
        version: impl Into<String>,
        identifier: impl Into<String>,
        display: impl Into<String>,
    ) {
        self.tables
            .write()
            .entry((category.into(), version.into()))
            .or_default()
            .insert(identifier.into(), display.into());
    }

    /// Bulk-load entries for one category and version.
    pub fn extend<I, K, V>(&self, category: &str, version: &str, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.tables
            .write()
            .entry((category.to_string(), version.to_string()))
            .or_default()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Total entries across every table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.read().values().map(HashMap::len).sum()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LocalizationPort for InMemoryLocalizationStore {
    async fn get(
        &self,
        identifier: &str,
        category: &str,
        version: &str,
    ) -> Result<Option<String>, LocalizationError> {
        let tables = self.tables.read();
        Ok(tables
            .get(&(category.to_string(), version.to_string()))
            .and_then(|table| table.get(identifier))
            .cloned())
    }
}

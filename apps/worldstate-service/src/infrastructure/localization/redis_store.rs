//! Redis localization store.
//!
//! The reference-data loader writes one hash per category and version under
//! the key `{category}:{version}`; each field is an identifier and its value
//! the display string. Lookups are a single `HGET`.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::application::ports::{LocalizationError, LocalizationPort};

/// Localization store backed by Redis hashes.
#[derive(Clone)]
pub struct RedisLocalizationStore {
    conn: ConnectionManager,
}

impl std::fmt::Debug for RedisLocalizationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisLocalizationStore").finish_non_exhaustive()
    }
}

impl RedisLocalizationStore {
    /// Connect to `redis_url`.
    ///
    /// # Errors
    ///
    /// Returns [`LocalizationError::Unavailable`] if the URL is invalid or
    /// the initial connection fails.
    pub async fn connect(redis_url: &str) -> Result<Self, LocalizationError> {
        let client = redis::Client::open(redis_url).map_err(unavailable)?;
        let conn = ConnectionManager::new(client).await.map_err(unavailable)?;
        Ok(Self { conn })
    }
}

/// Hash key holding one category at one version.
#[must_use]
pub fn table_key(category: &str, version: &str) -> String {
    format!("{category}:{version}")
}

#[async_trait]
impl LocalizationPort for RedisLocalizationStore {
    async fn get(
        &self,
        identifier: &str,
        category: &str,
        version: &str,
    ) -> Result<Option<String>, LocalizationError> {
        let mut conn = self.conn.clone();
        conn.hget::<_, _, Option<String>>(table_key(category, version), identifier)
            .await
            .map_err(|e| {
                if e.kind() == redis::ErrorKind::TypeError {
                    LocalizationError::UnexpectedValue {
                        message: e.to_string(),
                    }
                } else {
                    unavailable(e)
                }
            })
    }
}

fn unavailable(e: redis::RedisError) -> LocalizationError {
    LocalizationError::Unavailable {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_key_format() {
        assert_eq!(table_key("nodes", "2025-10-14"), "nodes:2025-10-14");
    }

    #[tokio::test]
    async fn invalid_url_is_unavailable() {
        let err = RedisLocalizationStore::connect("not a url").await.unwrap_err();
        assert!(matches!(err, LocalizationError::Unavailable { .. }));
    }
}

//! Localization store adapters.

mod in_memory;
mod redis_store;

pub use in_memory::InMemoryLocalizationStore;
pub use redis_store::{RedisLocalizationStore, table_key};

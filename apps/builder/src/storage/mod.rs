//! Key-value storage collaborator.
//!
//! The editor core never touches a concrete backend: it reads and writes
//! string values through `KeyValueStore`, carried as `Arc<dyn KeyValueStore>`.
//! `MemoryStore` backs tests and local runs; `RedisStore` is used when
//! `REDIS_URL` is configured.

pub mod memory;
pub mod redis_store;

use thiserror::Error;

pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Storage lock poisoned")]
    Poisoned,

    #[error("Could not encode stored value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String-valued key-value store. Implement this to swap backends without
/// touching the store, the persistence bridge, or the handlers.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Writes several keys as one unit. Backends that can do this atomically
    /// should override the sequential default.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

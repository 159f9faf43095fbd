//! The durable storage surface the app consumes.

use async_trait::async_trait;

use crate::error::StorageError;

/// Backend-agnostic string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, overwriting any prior value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Returns whether a value was present.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;
}

//! Store Module
//!
//! Persistent string key-value backends the cache and settings sit on.

mod file;
mod memory;

use async_trait::async_trait;

use crate::error::StoreError;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Result type returned by store backends.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Key-Value Store Trait ==
/// Minimal async key-value contract.
///
/// Each call is atomic for its single key. Nothing is atomic across calls.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value under `key`, `None` when absent.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes `key`. Absent keys are not an error.
    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Lists every key currently stored.
    async fn keys(&self) -> StoreResult<Vec<String>>;

    /// Deletes everything.
    async fn remove_all(&self) -> StoreResult<()>;
}

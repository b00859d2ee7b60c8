//! Key-value store port.
//!
//! Records are JSON strings under namespaced string keys. No transactions,
//! no secondary indexing beyond key-prefix listing; persistence is best
//! effort.
//!
//! # Design Rules
//!
//! - No storage-engine types in signatures
//! - Serialization is the caller's concern; values are opaque strings here

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No record under the given key.
    #[error("not found: {0}")]
    NotFound(String),

    /// Underlying storage failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// A value could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Simple string-keyed store with prefix listing.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the value under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError>;

    /// Store `value` under `key`, replacing any existing value.
    async fn put(&self, key: &str, value: &str) -> Result<(), RepositoryError>;

    /// List `(key, value)` pairs whose key starts with `prefix`, in key order.
    async fn list(&self, prefix: &str) -> Result<Vec<(String, String)>, RepositoryError>;

    /// Delete the value under `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), RepositoryError>;
}

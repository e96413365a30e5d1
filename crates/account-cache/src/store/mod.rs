//! Key-value store abstraction
//!
//! The session layer talks to its backing store through this trait:
//! `set`-with-TTL, `get`, `delete`, `exists`. Any operation may fail with
//! `StoreError::Unavailable` (network error, timeout, cancellation); the
//! store never retries internally — callers decide whether a failure is
//! fatal (fail-closed) or ignorable (fail-open).

use std::time::Duration;

use async_trait::async_trait;

mod memory_store;
mod redis_store;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn unavailable(cause: impl std::fmt::Display) -> Self {
        Self::Unavailable(cause.to_string())
    }
}

impl From<StoreError> for account_common::AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => Self::StoreUnavailable(msg),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value store with per-key expiry
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Set a key to a value that expires after `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()>;

    /// Get a value; `None` if the key is absent or expired
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Delete a key; deleting an absent key is not an error
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Check whether a key exists (and has not expired)
    async fn exists(&self, key: &str) -> StoreResult<bool>;
}

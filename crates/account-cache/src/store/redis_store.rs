//! Redis-backed session store.
//!
//! Every command is bounded by a configurable timeout; a command that does
//! not complete in time is reported as `StoreError::Unavailable`, exactly
//! like a connection failure. A cancelled in-flight call surfaces the same
//! way.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use crate::pool::RedisPool;

use super::{SessionStore, StoreError, StoreResult};

/// Session store over a Redis connection pool
#[derive(Clone)]
pub struct RedisStore {
    pool: RedisPool,
    command_timeout: Duration,
}

impl RedisStore {
    /// Create a new Redis store with the given command timeout
    #[must_use]
    pub fn new(pool: RedisPool, command_timeout: Duration) -> Self {
        Self {
            pool,
            command_timeout,
        }
    }

    /// Create a Redis store from application config
    pub fn from_config(config: &account_common::RedisConfig) -> Result<Self, StoreError> {
        let pool = RedisPool::from_config(config).map_err(StoreError::unavailable)?;
        Ok(Self::new(
            pool,
            Duration::from_millis(config.command_timeout_ms),
        ))
    }

    /// Run a store command under the configured deadline
    async fn bounded<T, F>(&self, fut: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        tokio::time::timeout(self.command_timeout, fut)
            .await
            .map_err(|_| StoreError::unavailable("command timed out"))?
    }
}

#[async_trait]
impl SessionStore for RedisStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        self.bounded(async {
            let mut conn = self.pool.get().await.map_err(StoreError::unavailable)?;
            conn.set_ex::<_, _, ()>(key, value, ttl.as_secs())
                .await
                .map_err(StoreError::unavailable)
        })
        .await
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.bounded(async {
            let mut conn = self.pool.get().await.map_err(StoreError::unavailable)?;
            conn.get::<_, Option<String>>(key)
                .await
                .map_err(StoreError::unavailable)
        })
        .await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.bounded(async {
            let mut conn = self.pool.get().await.map_err(StoreError::unavailable)?;
            conn.del::<_, ()>(key).await.map_err(StoreError::unavailable)
        })
        .await
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        self.bounded(async {
            let mut conn = self.pool.get().await.map_err(StoreError::unavailable)?;
            conn.exists::<_, bool>(key)
                .await
                .map_err(StoreError::unavailable)
        })
        .await
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("command_timeout", &self.command_timeout)
            .finish_non_exhaustive()
    }
}

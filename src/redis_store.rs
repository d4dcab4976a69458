//! Redis implementation of [`KvStore`].
//!
//! A single `ConnectionManager` is shared by the whole process. Each call
//! clones a handle for its own duration and drops it on every exit path.
//! Every command is bounded by `timeout` and passes through a circuit breaker.
//! Nothing is retried here.

use crate::circuit_breaker::{create_store_circuit_breaker, StoreCircuitBreaker};
use crate::store::{KvStore, StoreError, StoreResult};
use async_trait::async_trait;
use failsafe::futures::CircuitBreaker;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError, RedisResult};
use std::future::Future;
use std::time::Duration;

impl From<RedisError> for StoreError {
    fn from(err: RedisError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
    timeout: Duration,
    breaker: StoreCircuitBreaker,
}

impl RedisStore {
    /// Connects to `redis_url` and verifies the connection.
    ///
    /// # Arguments
    ///
    /// * `redis_url` - `redis://` or `rediss://` URL.
    /// * `timeout` - Deadline applied to each command.
    /// * `failure_threshold` - Consecutive failures before the breaker opens.
    pub async fn connect(
        redis_url: &str,
        timeout: Duration,
        failure_threshold: u32,
    ) -> StoreResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let manager = tokio::time::timeout(timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| StoreError::Timeout(timeout))??;

        let store = Self {
            manager,
            timeout,
            breaker: create_store_circuit_breaker(failure_threshold),
        };
        store.ping().await?;

        Ok(store)
    }

    async fn guarded<T, F>(&self, call: F) -> StoreResult<T>
    where
        F: Future<Output = RedisResult<T>> + Send,
        T: Send,
    {
        call_guarded(&self.breaker, self.timeout, call).await
    }
}

/// Runs one backend call under `timeout` and the circuit breaker.
///
/// Timeouts count as breaker failures. An open breaker rejects the call
/// without polling it.
pub async fn call_guarded<T, F>(
    breaker: &StoreCircuitBreaker,
    timeout: Duration,
    call: F,
) -> StoreResult<T>
where
    F: Future<Output = RedisResult<T>> + Send,
    T: Send,
{
    let bounded = async move {
        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(timeout)),
        }
    };

    match breaker.call(bounded).await {
        Ok(value) => Ok(value),
        Err(failsafe::Error::Inner(err)) => Err(err),
        Err(failsafe::Error::Rejected) => {
            tracing::warn!("Redis circuit open, rejecting call");
            Err(StoreError::Unavailable)
        }
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut conn = self.manager.clone();
        self.guarded(async move { conn.get::<_, Option<Vec<u8>>>(key).await })
            .await
    }

    async fn set_if_absent(&self, key: &str, value: &[u8]) -> StoreResult<bool> {
        let mut conn = self.manager.clone();
        self.guarded(async move { conn.set_nx::<_, _, bool>(key, value).await })
            .await
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.manager.clone();
        self.guarded(async move { conn.exists::<_, bool>(key).await })
            .await
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut conn = self.manager.clone();
        self.guarded(async move { conn.set::<_, _, ()>(key, value).await })
            .await
    }

    async fn delete(&self, key: &str) -> StoreResult<u64> {
        let mut conn = self.manager.clone();
        self.guarded(async move { conn.del::<_, u64>(key).await })
            .await
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.manager.clone();
        let pong: String = self
            .guarded(async move { redis::cmd("PING").query_async(&mut conn).await })
            .await?;
        if pong != "PONG" {
            return Err(StoreError::Backend(format!("unexpected PING reply: {}", pong)));
        }
        Ok(())
    }
}

//! Key-value store adapter.
//!
//! The repository only needs a handful of primitives from its backend, each
//! atomic at the backend level. [`KvStore`] captures them so Redis in
//! production and [`MemoryStore`] in tests satisfy the same contract.

use async_trait::async_trait;
use moka::future::Cache;
use std::fmt;
use std::time::Duration;

/// Faults raised by a store backend.
///
/// These are system faults, distinct from domain outcomes such as
/// "not found" or "already exists", which are plain return values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Transport or command failure reported by the backend.
    Backend(String),
    /// The call did not complete within its deadline.
    Timeout(Duration),
    /// Circuit breaker is open; the call was not attempted.
    Unavailable,
    /// A stored value could not be decoded as UTF-8 text.
    Decode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Backend(msg) => write!(f, "Store backend error: {}", msg),
            StoreError::Timeout(after) => write!(f, "Store call timed out after {:?}", after),
            StoreError::Unavailable => write!(f, "Store unavailable (circuit open)"),
            StoreError::Decode(msg) => write!(f, "Stored value is not valid UTF-8: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;

/// Atomic primitives over a flat key namespace.
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Returns the value stored at `key`, or `None` if absent.
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Stores `value` only if `key` is absent.
    /// Returns `true` iff this call created the key; never overwrites.
    async fn set_if_absent(&self, key: &str, value: &[u8]) -> StoreResult<bool>;

    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Unconditional overwrite.
    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Removes `key`, returning the number of keys removed (0 or 1).
    async fn delete(&self, key: &str) -> StoreResult<u64>;

    /// Round-trip to the backend, used by readiness checks.
    async fn ping(&self) -> StoreResult<()>;
}

/// In-process store backed by a moka cache with no capacity bound or expiry.
///
/// moka serializes initialization per key in its entry API, which gives
/// `set_if_absent` a single winner under concurrent callers.
#[derive(Clone)]
pub struct MemoryStore {
    entries: Cache<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().build(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).await)
    }

    async fn set_if_absent(&self, key: &str, value: &[u8]) -> StoreResult<bool> {
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert(value.to_vec())
            .await;
        Ok(entry.is_fresh())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.entries.contains_key(key))
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_vec()).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<u64> {
        Ok(self.entries.remove(key).await.map_or(0, |_| 1))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

//! Key-value store abstraction with TTL support.
//!
//! The cache adapter only needs three operations from its backing store, so
//! the store is a trait: the REST client lives in the client crate and
//! `MemoryStore` here serves tests and single-process use.

use crate::Error;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Remote key-value store with expiring keys.
///
/// Values are opaque strings. Implementations must drop a key once its TTL
/// has elapsed without any action from the caller.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the value stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any previous value, expiring after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn del(&self, key: &str) -> Result<(), Error>;
}

struct StoredValue {
    value: String,
    /// `None` when the TTL is too large to represent.
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// In-process store backed by a `HashMap`.
///
/// Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, StoredValue>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.values().filter(|v| !v.is_expired()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn contains_key(&self, key: &str) -> bool {
        self.entries.read().await.get(key).is_some_and(|v| !v.is_expired())
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(stored) if !stored.is_expired() => return Ok(Some(stored.value.clone())),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(StoredValue::is_expired) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        let stored = StoredValue { value: value.to_string(), expires_at: Instant::now().checked_add(ttl) };
        let mut entries = self.entries.write().await;
        entries.retain(|_, v| !v.is_expired());
        entries.insert(key.to_string(), stored);
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), Error> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

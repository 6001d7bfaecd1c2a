//! In-memory store backed by a shared [`Keyspace`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::Result;
use crate::store::{Clock, KeyValueStore, Keyspace};

/// Process-local [`KeyValueStore`].
///
/// Every call takes the keyspace write lock, so increments and appends are
/// atomic across tasks. Clones share the same keyspace.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    keyspace: Arc<RwLock<Keyspace>>,
}

impl MemoryStore {
    /// Creates an empty store on the system clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store on a custom clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            keyspace: Arc::new(RwLock::new(Keyspace::with_clock(clock))),
        }
    }

    /// Shared handle to the underlying keyspace, for the expiry sweep.
    pub fn keyspace(&self) -> Arc<RwLock<Keyspace>> {
        self.keyspace.clone()
    }

    /// Remaining TTL of `key` in milliseconds.
    pub async fn ttl_remaining_ms(&self, key: &str) -> Option<u64> {
        self.keyspace.write().await.ttl_remaining_ms(key)
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.keyspace.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.keyspace.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // Write lock: reads drop expired entries
        self.keyspace.write().await.get(key)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.keyspace.write().await.set(key, value, None)
    }

    async fn set_with_expiry(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<()> {
        debug!(key, ttl_secs, "set with expiry");
        self.keyspace.write().await.set(key, value, Some(ttl_secs))
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.keyspace.write().await.incr(key)
    }

    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize> {
        self.keyspace.write().await.rpush(key, value)
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        self.keyspace.write().await.lrange(key, start, stop)
    }

    async fn flush_all(&self) -> Result<()> {
        let dropped = self.keyspace.write().await.flush();
        info!("Store flushed: {} keys dropped", dropped);
        Ok(())
    }
}

//! Store Module
//!
//! The key-value boundary the policy layer is built on, plus an in-memory
//! implementation with TTL expiration.

mod clock;
mod entry;
mod keyspace;
mod memory;
mod value;


use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{Entry, Value};
pub use keyspace::Keyspace;
pub use memory::MemoryStore;
pub use value::{get_as, StoreValue};

// == Public Constants ==
/// Maximum allowed key length in bytes, the Redis string limit
pub const MAX_KEY_LENGTH: usize = 512 * 1024 * 1024; // 512 MB

/// Maximum allowed value size in bytes, the Redis string limit
pub const MAX_VALUE_SIZE: usize = 512 * 1024 * 1024; // 512 MB

// == Key Value Store ==
/// Operations the caching layer needs from a key-value store.
///
/// Implementations must make each call atomic with respect to concurrent
/// callers; in particular `incr` and `rpush` may not lose updates.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Bytes stored at `key`, or `None` when the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` at `key` without expiry, replacing any previous value.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Stores `value` at `key`, expiring after `ttl_secs` seconds.
    async fn set_with_expiry(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<()>;

    /// Atomically increments the integer at `key`, returning the new value.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Appends `value` to the list at `key`, returning the new length.
    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize>;

    /// List items in the inclusive range `[start, stop]`; negative indices
    /// count from the end.
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>>;

    /// Drops every key in the store.
    async fn flush_all(&self) -> Result<()>;
}

//! Keyspace Module
//!
//! Synchronous core of the in-memory store: a HashMap of entries with lazy
//! TTL expiration, atomic counters and append-only lists.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CacheError, Result};
use crate::store::{Clock, Entry, SystemClock, Value, MAX_KEY_LENGTH, MAX_VALUE_SIZE};

// == Keyspace ==
/// Key-value storage with TTL support.
#[derive(Debug)]
pub struct Keyspace {
    /// Key-value storage
    entries: HashMap<String, Entry>,
    /// Time source for stamping and expiring entries
    clock: Arc<dyn Clock>,
}

impl Default for Keyspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyspace {
    // == Constructor ==
    /// Creates an empty keyspace driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty keyspace driven by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
        }
    }

    // == Live Entry ==
    /// Returns the entry for `key` unless it is absent or expired.
    ///
    /// Expired entries are dropped on the spot so they can never be read.
    fn live_entry(&mut self, key: &str) -> Option<&mut Entry> {
        let now = self.clock.now_ms();
        if self.entries.get(key).is_some_and(|e| e.is_expired(now)) {
            self.entries.remove(key);
            return None;
        }
        self.entries.get_mut(key)
    }

    // == Get ==
    /// Retrieves the byte value stored at `key`.
    ///
    /// Returns `Ok(None)` for absent or expired keys.
    pub fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.live_entry(key) {
            None => Ok(None),
            Some(Entry {
                value: Value::Bytes(bytes),
                ..
            }) => Ok(Some(bytes.clone())),
            Some(entry) => Err(wrong_type(key, "string", &entry.value)),
        }
    }

    // == Set ==
    /// Stores a byte value with optional TTL, replacing whatever `key` held.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL in seconds (None = never expires)
    pub fn set(&mut self, key: &str, value: Vec<u8>, ttl: Option<u64>) -> Result<()> {
        validate_key(key)?;
        validate_value_len(value.len())?;
        if ttl == Some(0) {
            return Err(CacheError::InvalidRequest(
                "TTL must be at least one second".to_string(),
            ));
        }

        let entry = Entry::new(Value::Bytes(value), self.clock.now_ms(), ttl);
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    // == Increment ==
    /// Increments the integer at `key` by one and returns the new value.
    ///
    /// A missing key counts from zero. An existing expiry is kept.
    pub fn incr(&mut self, key: &str) -> Result<i64> {
        validate_key(key)?;
        let now = self.clock.now_ms();

        let Some(entry) = self.live_entry(key) else {
            let entry = Entry::new(Value::Bytes(b"1".to_vec()), now, None);
            self.entries.insert(key.to_string(), entry);
            return Ok(1);
        };

        let bytes = match &mut entry.value {
            Value::Bytes(bytes) => bytes,
            found => return Err(wrong_type(key, "string", found)),
        };
        let current: i64 = std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| CacheError::decode(key, "value is not an integer"))?;
        let next = current
            .checked_add(1)
            .ok_or_else(|| CacheError::decode(key, "increment would overflow"))?;

        *bytes = next.to_string().into_bytes();
        Ok(next)
    }

    // == Append To List ==
    /// Appends `value` to the list at `key`, creating it if needed.
    ///
    /// Returns the list length after the append.
    pub fn rpush(&mut self, key: &str, value: Vec<u8>) -> Result<usize> {
        validate_key(key)?;
        validate_value_len(value.len())?;
        let now = self.clock.now_ms();

        let Some(entry) = self.live_entry(key) else {
            let entry = Entry::new(Value::List(vec![value]), now, None);
            self.entries.insert(key.to_string(), entry);
            return Ok(1);
        };

        match &mut entry.value {
            Value::List(items) => {
                items.push(value);
                Ok(items.len())
            }
            found => Err(wrong_type(key, "list", found)),
        }
    }

    // == Read List Range ==
    /// Returns list items from `start` to `stop`, both inclusive.
    ///
    /// Negative indices count from the end (`-1` is the last item). Out of
    /// range bounds are clamped; an absent key reads as an empty list.
    pub fn lrange(&mut self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        match self.live_entry(key) {
            None => Ok(Vec::new()),
            Some(Entry {
                value: Value::List(items),
                ..
            }) => Ok(match resolve_range(items.len(), start, stop) {
                Some((from, to)) => items[from..=to].to_vec(),
                None => Vec::new(),
            }),
            Some(entry) => Err(wrong_type(key, "list", &entry.value)),
        }
    }

    // == TTL ==
    /// Remaining lifetime of `key` in milliseconds, None if absent or persistent.
    pub fn ttl_remaining_ms(&mut self, key: &str) -> Option<u64> {
        let now = self.clock.now_ms();
        self.live_entry(key)
            .and_then(|entry| entry.ttl_remaining_ms(now))
    }

    // == Flush ==
    /// Removes every key. Returns how many were dropped.
    pub fn flush(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Cleanup Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the number of stored entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

fn validate_value_len(len: usize) -> Result<()> {
    if len > MAX_VALUE_SIZE {
        return Err(CacheError::InvalidRequest(format!(
            "Value exceeds maximum size of {} bytes",
            MAX_VALUE_SIZE
        )));
    }
    Ok(())
}

fn wrong_type(key: &str, expected: &'static str, found: &Value) -> CacheError {
    CacheError::WrongType {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}

/// Maps an inclusive, possibly negative `[start, stop]` onto `0..len`.
fn resolve_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start > stop || start >= len {
        None
    } else {
        Some((start as usize, stop as usize))
    }
}

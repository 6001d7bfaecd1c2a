//! Store Entry Module
//!
//! Defines the structure for individual store entries with TTL support.

// == Value ==
/// What a key holds: a plain byte string or an ordered list of byte strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bytes(Vec<u8>),
    List(Vec<Vec<u8>>),
}

impl Value {
    /// Name of the value kind, used in type errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bytes(_) => "string",
            Value::List(_) => "list",
        }
    }
}

// == Entry ==
/// A single keyed value with creation and optional expiry timestamps.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The stored value
    pub value: Value,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl Entry {
    // == Constructor ==
    /// Creates a new entry at `now_ms` with optional TTL.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `now_ms` - Current time in Unix milliseconds
    /// * `ttl_seconds` - Optional TTL in seconds
    pub fn new(value: Value, now_ms: u64, ttl_seconds: Option<u64>) -> Self {
        let expires_at = ttl_seconds.map(|ttl| now_ms.saturating_add(ttl.saturating_mul(1000)));

        Self {
            value,
            created_at: now_ms,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// the expiration time.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(0)` if the entry has expired (TTL elapsed)
    /// - `Some(remaining_ms)` if the entry has TTL and hasn't expired
    /// - `None` if the entry has no TTL (never expires)
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.expires_at.map(|expires| expires.saturating_sub(now_ms))
    }
}

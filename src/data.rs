//! Data Cache Module
//!
//! Stores scalar values under generated keys and reads them back through
//! typed conversions. Every `store` call is accounted.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::accounting::CallAccounting;
use crate::error::{CacheError, Result};
use crate::store::{get_as, KeyValueStore, StoreValue};

/// Identity under which [`DataCache::store`] calls are accounted.
pub const STORE_IDENTITY: &str = "DataCache.store";

// == Data ==
/// A scalar accepted by [`DataCache::store`].
///
/// `Debug` prints the value as a literal (`"foo"`, `42`, `b"bar"`), which is
/// how stored inputs show up in the call history.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Data {
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::Int(n) => write!(f, "{}", n),
            Data::Float(x) => write!(f, "{:?}", x),
            Data::Str(s) => write!(f, "{:?}", s),
            Data::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
        }
    }
}

impl StoreValue for Data {
    fn encode(&self) -> Vec<u8> {
        match self {
            Data::Int(n) => n.encode(),
            Data::Float(x) => x.encode(),
            Data::Str(s) => s.encode(),
            Data::Bytes(b) => b.clone(),
        }
    }

    /// The store keeps no type tag, so raw bytes are all that comes back.
    fn decode(_key: &str, bytes: &[u8]) -> Result<Self> {
        Ok(Data::Bytes(bytes.to_vec()))
    }
}

impl From<&str> for Data {
    fn from(value: &str) -> Self {
        Data::Str(value.to_string())
    }
}

impl From<String> for Data {
    fn from(value: String) -> Self {
        Data::Str(value)
    }
}

impl From<i64> for Data {
    fn from(value: i64) -> Self {
        Data::Int(value)
    }
}

impl From<f64> for Data {
    fn from(value: f64) -> Self {
        Data::Float(value)
    }
}

impl From<&[u8]> for Data {
    fn from(value: &[u8]) -> Self {
        Data::Bytes(value.to_vec())
    }
}

// == Data Cache ==
/// Random-key value store with accounted writes.
#[derive(Clone)]
pub struct DataCache {
    store: Arc<dyn KeyValueStore>,
    accounting: CallAccounting,
}

impl DataCache {
    /// Creates a cache on `store`, recording write history if `history` is set.
    pub fn new(store: Arc<dyn KeyValueStore>, history: bool) -> Self {
        let accounting = CallAccounting::new(store.clone(), STORE_IDENTITY).with_history(history);
        Self { store, accounting }
    }

    pub fn accounting(&self) -> &CallAccounting {
        &self.accounting
    }

    // == Store ==
    /// Saves `data` under a fresh UUID key and returns the key.
    pub async fn store(&self, data: impl Into<Data>) -> Result<String> {
        let store = self.store.clone();
        self.accounting
            .invoke((data.into(),), |(data,)| async move {
                let key = Uuid::new_v4().to_string();
                store.set(&key, data.encode()).await?;
                Ok::<_, CacheError>(key)
            })
            .await
    }

    // == Get ==
    /// Reads `key` converted to `T`.
    ///
    /// `Ok(None)` means the key is absent; bytes that do not convert to `T`
    /// are a [`Decode`](crate::error::CacheError::Decode) error.
    pub async fn get<T: StoreValue>(&self, key: &str) -> Result<Option<T>> {
        get_as::<T>(self.store.as_ref(), key).await
    }

    /// Reads `key` as UTF-8 text.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get::<String>(key).await
    }

    /// Reads `key` as an integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get::<i64>(key).await
    }
}

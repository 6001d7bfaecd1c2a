//! Value Codec Module
//!
//! Conversions between Rust values and the byte strings a store holds.
//! Decoding is strict: bytes that do not convert are an error, never a
//! default value.

use crate::error::{CacheError, Result};
use crate::store::KeyValueStore;

// == Store Value ==
/// A type that can be written to and read back from a store.
pub trait StoreValue: Sized {
    /// Byte representation written to the store.
    fn encode(&self) -> Vec<u8>;

    /// Parses bytes read from `key`.
    fn decode(key: &str, bytes: &[u8]) -> Result<Self>;
}

impl StoreValue for Vec<u8> {
    fn encode(&self) -> Vec<u8> {
        self.clone()
    }

    fn decode(_key: &str, bytes: &[u8]) -> Result<Self> {
        Ok(bytes.to_vec())
    }
}

impl StoreValue for String {
    fn encode(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn decode(key: &str, bytes: &[u8]) -> Result<Self> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| CacheError::decode(key, format!("invalid UTF-8: {}", e)))
    }
}

/// Numbers are stored as their decimal text.
macro_rules! numeric_store_value {
    ($($ty:ty => $encode:literal),* $(,)?) => {
        $(
            impl StoreValue for $ty {
                fn encode(&self) -> Vec<u8> {
                    format!($encode, self).into_bytes()
                }

                fn decode(key: &str, bytes: &[u8]) -> Result<Self> {
                    let text = String::decode(key, bytes)?;
                    text.trim().parse::<$ty>().map_err(|e| {
                        CacheError::decode(
                            key,
                            format!("'{}' is not a valid {}: {}", text, stringify!($ty), e),
                        )
                    })
                }
            }
        )*
    };
}

numeric_store_value! {
    i64 => "{}",
    u64 => "{}",
    f64 => "{:?}",
}

// == Typed Get ==
/// Reads `key` and converts it with `T`'s decoder.
///
/// Returns `Ok(None)` when the key is absent, so a stored empty string or
/// zero is never confused with a missing value.
pub async fn get_as<T: StoreValue>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key).await? {
        Some(bytes) => T::decode(key, &bytes).map(Some),
        None => Ok(None),
    }
}

//! Fetch Cache - fetch-through caching and call accounting over a key-value store
//!
//! Provides a TTL fetch-through cache with per-input access counters, call
//! counting with input/output history, and replay of recorded calls.

pub mod accounting;
pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod fetch;
pub mod models;
pub mod replay;
pub mod store;
pub mod tasks;

pub use accounting::{Accounted, CallAccounting};
pub use api::AppState;
pub use config::Config;
pub use data::{Data, DataCache};
pub use error::{CacheError, Result};
pub use fetch::{FetchThroughCache, HttpFetcher, Producer};
pub use replay::replay;
pub use store::{KeyValueStore, MemoryStore};
pub use tasks::spawn_expiry_task;

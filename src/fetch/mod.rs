//! Fetch Module
//!
//! Fetch-through caching with TTL and per-input access counting.

mod cache;
mod flight;
mod producer;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use cache::{cache_key, count_key, FetchThroughCache, Fetched, Outcome};
pub use producer::{HttpFetcher, Producer};
pub use stats::FetchStats;

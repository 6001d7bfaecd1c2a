//! Fetch Statistics Module
//!
//! Tracks fetch-through cache performance: hits, misses and producer failures.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Fetch Stats ==
/// Snapshot of fetch-through cache metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FetchStats {
    /// Calls served from the store
    pub hits: u64,
    /// Calls that found no fresh value and invoked the producer, failed
    /// invocations included
    pub misses: u64,
    /// Producer invocations that failed (a subset of `misses`)
    pub producer_errors: u64,
}

impl FetchStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters shared by concurrent callers of one cache.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    producer_errors: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_producer_error(&self) {
        self.producer_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> FetchStats {
        FetchStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            producer_errors: self.producer_errors.load(Ordering::Relaxed),
        }
    }
}

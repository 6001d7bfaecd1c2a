//! Fetch-Through Cache
//!
//! Serves producer results from the store while they are fresh, falls back to
//! the producer on a miss, and counts every access per input.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::fetch::flight::FlightRegistry;
use crate::fetch::stats::{FetchStats, StatsRecorder};
use crate::fetch::Producer;
use crate::store::{get_as, KeyValueStore, StoreValue};

/// Store key holding the cached output for `input`.
pub fn cache_key(input: &str) -> String {
    format!("cache:{}", input)
}

/// Store key holding the access counter for `input`.
pub fn count_key(input: &str) -> String {
    format!("count:{}", input)
}

// == Outcome ==
/// Whether a call was served from the store or by the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Hit,
    Miss,
}

/// A value returned by [`FetchThroughCache::get_with_outcome`].
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub outcome: Outcome,
    /// Access counter after this call was counted
    pub access_count: i64,
}

// == Fetch Through Cache ==
/// Wraps a [`Producer`] with a fixed-TTL cache in a [`KeyValueStore`].
///
/// Cached values live at `cache:<input>` and expire through the store's own
/// TTL. Every call increments `count:<input>`, hit or miss.
///
/// Without single-flight, concurrent misses for the same input each call the
/// producer and the last store write wins.
pub struct FetchThroughCache<P> {
    store: Arc<dyn KeyValueStore>,
    producer: P,
    ttl_secs: u64,
    flights: Option<FlightRegistry>,
    stats: StatsRecorder,
}

impl<P: Producer> FetchThroughCache<P> {
    // == Constructor ==
    /// Wraps `producer`, caching its results for `ttl_secs` seconds.
    ///
    /// The TTL is at least one second.
    pub fn new(store: Arc<dyn KeyValueStore>, producer: P, ttl_secs: u64) -> Self {
        Self {
            store,
            producer,
            ttl_secs: ttl_secs.max(1),
            flights: None,
            stats: StatsRecorder::default(),
        }
    }

    /// Makes concurrent misses for one input share a single producer call.
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.flights = enabled.then(FlightRegistry::default);
        self
    }

    /// TTL applied to freshly produced values.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// The wrapped producer.
    pub fn producer(&self) -> &P {
        &self.producer
    }

    // == Get ==
    /// Returns the value for `input`, from the store if fresh, else from the
    /// producer.
    pub async fn get(&self, input: &str) -> Result<P::Output> {
        Ok(self.get_with_outcome(input).await?.value)
    }

    /// Like [`get`](Self::get), also reporting hit/miss and the access count.
    pub async fn get_with_outcome(&self, input: &str) -> Result<Fetched<P::Output>> {
        let access_count = self.store.incr(&count_key(input)).await?;
        let key = cache_key(input);

        if let Some(value) = self.lookup(&key).await? {
            return Ok(self.hit(input, value, access_count));
        }

        let value = match &self.flights {
            None => {
                self.stats.record_miss();
                self.produce(input, &key).await?
            }
            Some(flights) => {
                let flight = flights.lock_for(&key);
                let _guard = flight.lock().await;

                // Another caller may have filled the key while we waited
                if let Some(value) = self.lookup(&key).await? {
                    return Ok(self.hit(input, value, access_count));
                }
                self.stats.record_miss();
                self.produce(input, &key).await?
            }
        };

        debug!(input, access_count, "cache miss");
        Ok(Fetched {
            value,
            outcome: Outcome::Miss,
            access_count,
        })
    }

    // == Access Count ==
    /// Number of calls made for `input` since the store was last flushed.
    pub async fn access_count(&self, input: &str) -> Result<i64> {
        Ok(get_as::<i64>(self.store.as_ref(), &count_key(input))
            .await?
            .unwrap_or(0))
    }

    // == Stats ==
    /// Hit/miss counters of this cache instance.
    pub fn stats(&self) -> FetchStats {
        self.stats.snapshot()
    }

    async fn lookup(&self, key: &str) -> Result<Option<P::Output>> {
        get_as::<P::Output>(self.store.as_ref(), key).await
    }

    fn hit(&self, input: &str, value: P::Output, access_count: i64) -> Fetched<P::Output> {
        self.stats.record_hit();
        debug!(input, access_count, "cache hit");
        Fetched {
            value,
            outcome: Outcome::Hit,
            access_count,
        }
    }

    async fn produce(&self, input: &str, key: &str) -> Result<P::Output> {
        let value = match self.producer.produce(input).await {
            Ok(value) => value,
            Err(e) => {
                self.stats.record_producer_error();
                warn!(input, error = %e, "producer failed");
                return Err(e);
            }
        };

        self.store
            .set_with_expiry(key, value.encode(), self.ttl_secs)
            .await?;
        info!(input, ttl_secs = self.ttl_secs, "cached fresh value");
        Ok(value)
    }
}

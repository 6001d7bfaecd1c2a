//! Property-Based Tests for the Fetch Module
//!
//! Checks the fetch-through guarantees over random inputs and call patterns.

use async_trait::async_trait;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::fetch::{FetchThroughCache, Outcome, Producer};
use crate::store::{ManualClock, MemoryStore};

#[derive(Default)]
struct EchoProducer {
    calls: AtomicUsize,
}

#[async_trait]
impl Producer for EchoProducer {
    type Output = String;

    async fn produce(&self, input: &str) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{}@{}", input, n))
    }
}

fn input_strategy() -> impl Strategy<Value = String> {
    "https?://[a-z]{1,12}\\.[a-z]{2,3}/[a-z0-9/]{0,20}".prop_map(|s| s)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Two calls inside the TTL window invoke the producer once and agree.
    #[test]
    fn prop_repeat_within_ttl_is_a_hit(
        input in input_strategy(),
        ttl in 1u64..600,
        gap_ms in 0u64..600_000
    ) {
        prop_assume!(gap_ms < ttl * 1000);
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let store = Arc::new(MemoryStore::with_clock(clock.clone()));
        let cache = FetchThroughCache::new(store, EchoProducer::default(), ttl);

        let (first, second) = tokio_test::block_on(async {
            let first = cache.get_with_outcome(&input).await.unwrap();
            clock.advance(Duration::from_millis(gap_ms));
            let second = cache.get_with_outcome(&input).await.unwrap();
            (first, second)
        });

        prop_assert_eq!(first.outcome, Outcome::Miss);
        prop_assert_eq!(second.outcome, Outcome::Hit);
        prop_assert_eq!(first.value, second.value);
        prop_assert_eq!(cache.producer().calls.load(Ordering::SeqCst), 1);
    }

    // Once the TTL has elapsed the next call misses and produces again.
    #[test]
    fn prop_call_after_ttl_is_a_miss(
        input in input_strategy(),
        ttl in 1u64..600,
        extra_ms in 0u64..60_000
    ) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let store = Arc::new(MemoryStore::with_clock(clock.clone()));
        let cache = FetchThroughCache::new(store, EchoProducer::default(), ttl);

        let second = tokio_test::block_on(async {
            cache.get(&input).await.unwrap();
            clock.advance(Duration::from_millis(ttl * 1000 + extra_ms));
            cache.get_with_outcome(&input).await.unwrap()
        });

        prop_assert_eq!(second.outcome, Outcome::Miss);
        prop_assert_eq!(second.access_count, 2);
        prop_assert_eq!(cache.producer().calls.load(Ordering::SeqCst), 2);
    }

    // The access counter equals the number of calls, whatever mix of hits,
    // misses and expiries they produce.
    #[test]
    fn prop_counter_counts_every_call(
        input in input_strategy(),
        gaps in prop::collection::vec(0u64..20_000, 1..40)
    ) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let store = Arc::new(MemoryStore::with_clock(clock.clone()));
        let cache = FetchThroughCache::new(store, EchoProducer::default(), 10);

        let count = tokio_test::block_on(async {
            for gap in &gaps {
                clock.advance(Duration::from_millis(*gap));
                cache.get(&input).await.unwrap();
            }
            cache.access_count(&input).await.unwrap()
        });

        prop_assert_eq!(count, gaps.len() as i64);
        let stats = cache.stats();
        prop_assert_eq!(stats.hits + stats.misses, gaps.len() as u64);
    }
}

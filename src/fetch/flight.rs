//! Single-flight registry: one async mutex per cache key.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Hands out a shared lock per key so concurrent misses queue behind the
/// first producer call instead of running their own.
///
/// Entries are weak; a key's lock disappears once no caller holds it.
#[derive(Debug, Default)]
pub(crate) struct FlightRegistry {
    flights: Mutex<HashMap<String, Weak<tokio::sync::Mutex<()>>>>,
}

impl FlightRegistry {
    /// Lock guarding production of `key`.
    pub(crate) fn lock_for(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut flights = self.flights.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = flights.get(key).and_then(Weak::upgrade) {
            return existing;
        }

        flights.retain(|_, flight| flight.strong_count() > 0);
        let lock = Arc::new(tokio::sync::Mutex::new(()));
        flights.insert(key.to_string(), Arc::downgrade(&lock));
        lock
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.flights
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

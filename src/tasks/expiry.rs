//! Expiry Sweep Task
//!
//! Background task that periodically drops expired keys from the in-memory
//! store. Reads already hide expired keys; the sweep only reclaims memory for
//! keys nobody reads again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::Keyspace;

/// Spawns a background task that periodically removes expired keys.
///
/// The task sleeps for `interval_secs` between runs and takes the keyspace
/// write lock only for the sweep itself.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store = MemoryStore::new();
/// let sweep = spawn_expiry_task(store.keyspace(), 1);
/// // Later, during shutdown:
/// sweep.abort();
/// ```
pub fn spawn_expiry_task(keyspace: Arc<RwLock<Keyspace>>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = keyspace.write().await.cleanup_expired();

            if removed > 0 {
                info!("Expiry sweep: removed {} expired keys", removed);
            } else {
                debug!("Expiry sweep: no expired keys found");
            }
        }
    })
}

//! Expiry Sweep Task
//!
//! Background task that periodically removes stale cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::service::SharedCache;

/// Spawns a background task that calls `clear_expired` on the cache.
///
/// The task loops forever, sleeping `cleanup_interval_secs` between sweeps
/// (at least one second). Abort the returned handle during shutdown.
///
/// # Example
/// ```ignore
/// let cleanup_handle = spawn_cleanup_task(service.cache(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: SharedCache, cleanup_interval_secs: u64) -> JoinHandle<()> {
    spawn_with_interval(cache, Duration::from_secs(cleanup_interval_secs.max(1)))
}

fn spawn_with_interval(cache: SharedCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting cache expiry sweep every {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.write().await.clear_expired();

            if removed > 0 {
                info!("Cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
        }
    })
}

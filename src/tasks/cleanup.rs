//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired entries out of a cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::domains::Sweepable;

/// Spawns a background task that periodically calls `cleanup_expired`.
///
/// The task runs in an infinite loop, sleeping for `interval` between
/// sweeps. The sweep itself is synchronous and takes the cache's lock
/// only for the duration of one walk.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let images = Arc::new(ImageCache::new(&config.images));
/// let handle = spawn_cleanup_task(images.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: Arc<dyn Sweepable>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup for '{}' every {:?}",
            cache.name(),
            interval
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired();

            if removed > 0 {
                info!(
                    "TTL cleanup: removed {} expired entries from '{}'",
                    removed,
                    cache.name()
                );
            } else {
                debug!("TTL cleanup: no expired entries in '{}'", cache.name());
            }
        }
    })
}

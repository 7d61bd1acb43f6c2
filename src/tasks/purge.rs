//! Expiry Purge Task
//!
//! Background task that periodically removes stale cache entries so storage
//! is reclaimed even for URLs that are never read again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::BoundedUrlCache;
use crate::config::Config;

/// Spawns a background task that periodically purges expired cache entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between purge runs.
///
/// # Arguments
/// * `cache` - Shared reference to the cache
/// * `interval_secs` - Interval in seconds between purge runs
///
/// # Returns
/// A JoinHandle for the spawned task, to be aborted on shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(BoundedUrlCache::from_config(store, &config));
/// let purge_handle = spawn_purge_task(cache.clone(), 3600);
/// // Later, during shutdown:
/// purge_handle.abort();
/// ```
pub fn spawn_purge_task(cache: Arc<BoundedUrlCache>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting cache purge task with interval of {} seconds",
            interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired().await;

            if removed > 0 {
                info!("Cache purge: removed {} expired entries", removed);
            } else {
                debug!("Cache purge: no expired entries found");
            }
        }
    })
}

/// Starts the purge task if `config.purge_interval` is non-zero.
pub fn spawn_configured_purge(
    cache: Arc<BoundedUrlCache>,
    config: &Config,
) -> Option<JoinHandle<()>> {
    (config.purge_interval > 0).then(|| spawn_purge_task(cache, config.purge_interval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;

    const HOUR_MS: u64 = 60 * 60 * 1000;

    fn cache_with_clock() -> (Arc<BoundedUrlCache>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        let cache = BoundedUrlCache::new(Arc::new(MemoryStore::new()), 1024, HOUR_MS)
            .with_clock(clock.clone());
        (Arc::new(cache), clock)
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_task_removes_expired_entries() {
        let (cache, clock) = cache_with_clock();

        cache.put("stale", "value").await;
        cache.put("fresh", "value").await;
        clock.advance(HOUR_MS / 2);
        cache.put("fresh", "value").await;
        clock.advance(HOUR_MS / 2 + 1);

        let handle = spawn_purge_task(cache.clone(), 1);

        // Paused clock auto-advances through the task's sleep
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(cache.keys().await, vec!["fresh"]);
        assert_eq!(cache.stats().await.entry_count, 1);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_task_preserves_valid_entries() {
        let (cache, _) = cache_with_clock();

        cache.put("long_lived", "value").await;
        let handle = spawn_purge_task(cache.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(cache.get("long_lived").await.as_deref(), Some("value"));
        handle.abort();
    }

    #[tokio::test]
    async fn test_configured_purge_disabled_by_default() {
        let (cache, _) = cache_with_clock();
        assert!(spawn_configured_purge(cache.clone(), &Config::default()).is_none());

        let config = Config {
            purge_interval: 60,
            ..Config::default()
        };
        let handle = spawn_configured_purge(cache, &config).expect("task should start");
        handle.abort();
    }

    #[tokio::test]
    async fn test_purge_task_can_be_aborted() {
        let (cache, _) = cache_with_clock();

        let handle = spawn_purge_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}

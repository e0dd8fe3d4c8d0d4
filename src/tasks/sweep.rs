//! Stat Cache Expiry Sweep
//!
//! Expired entries are already ignored on lookup, but an entry that is never
//! looked up again would otherwise sit in memory until LRU pressure evicts
//! it. This task bounds how long that can take.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::caching::CachingBucket;

/// Spawns a task that purges expired stat cache entries every
/// `interval_secs` seconds.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let bucket = Arc::new(CachingBucket::new(ttl, cache, clock, wrapped));
/// let sweep_handle = spawn_sweep_task(bucket.clone(), 30);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(bucket: Arc<CachingBucket>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting stat cache sweep with interval of {} seconds",
            interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = bucket.purge_expired();
            if removed > 0 {
                info!("Stat cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Stat cache sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::{Bucket, CreateObjectRequest, InMemoryBucket};
    use crate::cache::LruStatCache;
    use crate::clock::SimulatedClock;

    fn caching_bucket(clock: Arc<SimulatedClock>) -> Arc<CachingBucket> {
        Arc::new(CachingBucket::new(
            Duration::from_secs(60),
            Box::new(LruStatCache::new(100)),
            clock,
            Arc::new(InMemoryBucket::new("b")),
        ))
    }

    async fn create(bucket: &CachingBucket, name: &str) {
        let req = CreateObjectRequest {
            name: name.to_string(),
            ..Default::default()
        };
        bucket.create_object(&req).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_removes_expired_entries() {
        let clock = Arc::new(SimulatedClock::default());
        let bucket = caching_bucket(clock.clone());
        create(&bucket, "expire_soon").await;

        let handle = spawn_sweep_task(bucket.clone(), 1);

        clock.advance(chrono::Duration::seconds(61));
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(bucket.cache_stats().total_entries, 0);
        assert_eq!(bucket.cache_stats().expirations, 1);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_preserves_live_entries() {
        let clock = Arc::new(SimulatedClock::default());
        let bucket = caching_bucket(clock.clone());
        create(&bucket, "long_lived").await;

        let handle = spawn_sweep_task(bucket.clone(), 1);

        clock.advance(chrono::Duration::seconds(30));
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(bucket.cache_stats().total_entries, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let bucket = caching_bucket(Arc::new(SimulatedClock::default()));

        let handle = spawn_sweep_task(bucket, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}

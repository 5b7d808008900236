//! Expiry Worker
//!
//! Dedicated background thread that drains an [`ExpiryScheduler`] and removes
//! the matching entries from a [`ConcurrentStore`].
//!
//! The thread drives its own current-thread tokio runtime, so a cache can be
//! built from plain synchronous code as well as from inside an async runtime.

use std::hash::Hash;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, trace};

use crate::cache::{ConcurrentStore, ExpiryScheduler, StatsCounters};
use crate::error::Result;

// == Expiry Worker ==
/// Owned handle to a running expiry worker.
///
/// Dropping the handle shuts the worker down and joins its thread.
#[derive(Debug)]
pub struct ExpiryWorker<K> {
    scheduler: Arc<ExpiryScheduler<K>>,
    handle: Option<JoinHandle<()>>,
}

impl<K> ExpiryWorker<K>
where
    K: Hash + Eq + Send + Sync + 'static,
{
    /// Starts a worker thread consuming `scheduler` and expiring keys in `store`.
    ///
    /// # Errors
    /// Returns [`CacheError::Worker`](crate::error::CacheError::Worker) if the
    /// runtime or the thread cannot be created.
    pub fn spawn<V>(
        store: Arc<ConcurrentStore<K, V>>,
        scheduler: Arc<ExpiryScheduler<K>>,
        stats: Arc<StatsCounters>,
    ) -> Result<Self>
    where
        V: Send + Sync + 'static,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;

        let worker_scheduler = Arc::clone(&scheduler);
        let handle = thread::Builder::new()
            .name("expiry-worker".to_string())
            .spawn(move || runtime.block_on(run(store, worker_scheduler, stats)))?;

        Ok(Self {
            scheduler,
            handle: Some(handle),
        })
    }
}

impl<K> ExpiryWorker<K> {
    // == Shutdown ==
    /// Cancels the worker and waits for its thread to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    /// Returns true once the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .map_or(true, |handle| handle.is_finished())
    }

    fn stop(&mut self) {
        self.scheduler.close();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Expiry worker panicked before shutdown");
            }
        }
    }
}

impl<K> Drop for ExpiryWorker<K> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Worker loop: runs until the scheduler is closed.
async fn run<K, V>(
    store: Arc<ConcurrentStore<K, V>>,
    scheduler: Arc<ExpiryScheduler<K>>,
    stats: Arc<StatsCounters>,
) where
    K: Hash + Eq,
{
    info!("Expiry worker started");

    while let Some(record) = scheduler.take_expired().await {
        if store.remove_if_stamp(&record.key, record.stamp) {
            stats.record_expiration();
            debug!(stamp = record.stamp, "Expired cache entry");
        } else {
            // Key was removed or rewritten after this record was scheduled
            stats.record_stale_expiry();
            trace!(stamp = record.stamp, "Skipped stale expiry record");
        }
    }

    info!("Expiry worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::{Duration, Instant};

    fn setup() -> (
        Arc<ConcurrentStore<String, String>>,
        Arc<ExpiryScheduler<String>>,
        Arc<StatsCounters>,
    ) {
        (
            Arc::new(ConcurrentStore::new()),
            Arc::new(ExpiryScheduler::new()),
            Arc::new(StatsCounters::new()),
        )
    }

    #[test]
    fn test_worker_removes_expired_entries() {
        let (store, scheduler, stats) = setup();
        let worker =
            ExpiryWorker::spawn(store.clone(), scheduler.clone(), stats.clone()).unwrap();

        let stamp = store
            .put("expire_soon".to_string(), Some("value".to_string()))
            .unwrap();
        scheduler.schedule(
            "expire_soon".to_string(),
            stamp,
            Instant::now() + Duration::from_millis(20),
        );

        sleep(Duration::from_millis(200));

        assert!(store.get(&"expire_soon".to_string()).is_none());
        assert_eq!(stats.snapshot(0, 0).expirations, 1);
        worker.shutdown();
    }

    #[test]
    fn test_worker_preserves_entries_before_deadline() {
        let (store, scheduler, stats) = setup();
        let worker = ExpiryWorker::spawn(store.clone(), scheduler.clone(), stats).unwrap();

        let stamp = store
            .put("long_lived".to_string(), Some("value".to_string()))
            .unwrap();
        scheduler.schedule(
            "long_lived".to_string(),
            stamp,
            Instant::now() + Duration::from_secs(3600),
        );

        sleep(Duration::from_millis(100));

        assert_eq!(
            store.get(&"long_lived".to_string()),
            Some("value".to_string())
        );
        assert_eq!(scheduler.len(), 1);
        worker.shutdown();
    }

    #[test]
    fn test_worker_skips_stale_records() {
        let (store, scheduler, stats) = setup();
        let worker =
            ExpiryWorker::spawn(store.clone(), scheduler.clone(), stats.clone()).unwrap();

        let old = store.put("key".to_string(), Some("old".to_string())).unwrap();
        store.put("key".to_string(), Some("new".to_string()));
        scheduler.schedule("key".to_string(), old, Instant::now());

        sleep(Duration::from_millis(100));

        assert_eq!(store.get(&"key".to_string()), Some("new".to_string()));
        let snapshot = stats.snapshot(0, 0);
        assert_eq!(snapshot.expirations, 0);
        assert_eq!(snapshot.stale_expiries, 1);
        worker.shutdown();
    }

    #[test]
    fn test_worker_shutdown_is_prompt() {
        let (store, scheduler, stats) = setup();
        scheduler.schedule("far".to_string(), 1, Instant::now() + Duration::from_secs(3600));
        let worker = ExpiryWorker::spawn(store, scheduler.clone(), stats).unwrap();

        assert!(!worker.is_finished());

        let start = Instant::now();
        worker.shutdown();

        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(scheduler.is_closed());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_worker_stops_on_drop() {
        let (store, scheduler, stats) = setup();
        let worker = ExpiryWorker::spawn(store, scheduler.clone(), stats).unwrap();

        drop(worker);

        assert!(scheduler.is_closed());
    }
}

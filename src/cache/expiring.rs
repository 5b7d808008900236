//! Expiring Cache Module
//!
//! Public facade combining the concurrent store, the expiry scheduler and the
//! background worker.

use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::info;

use crate::cache::{
    ttl_millis, Cache, CacheBuilder, CacheStats, ConcurrentStore, ExpiryScheduler,
    StatsCounters,
};
use crate::error::Result;
use crate::tasks::ExpiryWorker;

// == Expiring Cache ==
/// Concurrent key-value cache with an optional, cache-wide TTL.
///
/// Lookups only consult the store. An entry whose deadline has passed stays
/// visible until the worker gets to it, which is normally within a
/// millisecond or two of the deadline.
///
/// # Example
/// ```
/// use expiring_cache::ExpiringCache;
///
/// let cache: ExpiringCache<String, u32> = ExpiringCache::builder()
///     .with_expiry(60_000)
///     .build()
///     .unwrap();
///
/// cache.insert("answer".to_string(), 42);
/// assert_eq!(cache.get(&"answer".to_string()), Some(42));
/// ```
#[derive(Debug)]
pub struct ExpiringCache<K, V>
where
    K: Hash + Eq,
{
    store: Arc<ConcurrentStore<K, V>>,
    scheduler: Arc<ExpiryScheduler<K>>,
    stats: Arc<StatsCounters>,
    ttl: Option<Duration>,
    worker: Mutex<Option<ExpiryWorker<K>>>,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Returns a builder for configuring a new cache.
    pub fn builder() -> CacheBuilder<K, V> {
        CacheBuilder::new()
    }

    // == Constructor ==
    /// Creates a cache, starting the expiry worker when `ttl` is set.
    pub(crate) fn new(ttl: Option<Duration>) -> Result<Self> {
        let store = Arc::new(ConcurrentStore::new());
        let scheduler = Arc::new(ExpiryScheduler::new());
        let stats = Arc::new(StatsCounters::new());

        let worker = match ttl {
            Some(ttl) => {
                info!(ttl_ms = ttl_millis(ttl), "Starting cache expiry worker");
                Some(ExpiryWorker::spawn(
                    Arc::clone(&store),
                    Arc::clone(&scheduler),
                    Arc::clone(&stats),
                )?)
            }
            None => None,
        };

        Ok(Self {
            store,
            scheduler,
            stats,
            ttl,
            worker: Mutex::new(worker),
        })
    }

    // == Add ==
    /// Stores `value` under `key`, or removes `key` when `value` is `None`.
    ///
    /// With expiry enabled every successful write schedules its own deadline
    /// of now + TTL. A TTL too large to represent as an `Instant` never fires.
    pub fn add(&self, key: K, value: Option<V>) {
        match (value, self.ttl) {
            (Some(value), Some(ttl)) => {
                let Some(stamp) = self.store.put(key.clone(), Some(value)) else {
                    return;
                };
                if let Some(deadline) = Instant::now().checked_add(ttl) {
                    self.scheduler.schedule(key, stamp, deadline);
                }
            }
            (value, _) => {
                self.store.put(key, value);
            }
        }
    }

    /// Shorthand for `add(key, Some(value))`.
    pub fn insert(&self, key: K, value: V) {
        self.add(key, Some(value));
    }

    // == Remove ==
    /// Removes `key`. Any pending expiry record for it later fires as a no-op.
    pub fn remove(&self, key: &K) {
        self.store.remove(key);
    }

    // == Get ==
    /// Returns the current value for `key`.
    pub fn get(&self, key: &K) -> Option<V> {
        let value = self.store.get(key);
        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    // == Clear ==
    /// Removes every entry. Pending expiry records are left to fire as no-ops.
    pub fn clear(&self) {
        self.store.clear();
    }

    // == Size ==
    /// Number of entries currently stored.
    pub fn size(&self) -> u64 {
        self.store.size()
    }

    /// The configured TTL, if expiry is enabled.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Returns true while a worker is running for this cache.
    pub fn is_expiring(&self) -> bool {
        self.worker.lock().is_some()
    }

    // == Stats ==
    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.store.size(), self.scheduler.len())
    }

    // == Shutdown ==
    /// Stops the expiry worker and waits for it to exit.
    ///
    /// Idempotent. The cache keeps serving reads and writes afterwards, but
    /// entries no longer expire.
    pub fn shutdown(&self) {
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            worker.shutdown();
            info!("Cache expiry worker shut down");
        }
    }
}

impl<K, V> Cache<K, V> for ExpiringCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn add(&self, key: K, value: Option<V>) {
        ExpiringCache::add(self, key, value);
    }

    fn remove(&self, key: &K) {
        ExpiringCache::remove(self, key);
    }

    fn get(&self, key: &K) -> Option<V> {
        ExpiringCache::get(self, key)
    }

    fn clear(&self) {
        ExpiringCache::clear(self);
    }

    fn size(&self) -> u64 {
        ExpiringCache::size(self)
    }
}

//! Cache Builder Module

use std::hash::Hash;
use std::marker::PhantomData;
use std::time::Duration;

use crate::cache::ExpiringCache;
use crate::config::Config;
use crate::error::Result;

/// Builder for configuring and constructing an [`ExpiringCache`].
///
/// Without a TTL the cache never expires entries and starts no worker.
///
/// # Example
/// ```
/// use expiring_cache::CacheBuilder;
///
/// let cache: expiring_cache::ExpiringCache<String, String> = CacheBuilder::new()
///     .with_expiry(1_000)
///     .build()
///     .unwrap();
/// assert!(cache.is_expiring());
/// ```
#[derive(Debug, Clone)]
pub struct CacheBuilder<K, V> {
    ttl: Option<Duration>,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> CacheBuilder<K, V> {
    pub fn new() -> Self {
        Self {
            ttl: None,
            _marker: PhantomData,
        }
    }

    /// Builder preset from [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self {
            ttl: config.ttl(),
            _marker: PhantomData,
        }
    }

    /// Each entry expires `ttl_millis` milliseconds after it was written.
    pub fn with_expiry(self, ttl_millis: u64) -> Self {
        self.with_ttl(Duration::from_millis(ttl_millis))
    }

    /// Each entry expires `ttl` after it was written.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

impl<K, V> Default for CacheBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheBuilder<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Builds the cache, starting the expiry worker if a TTL was configured.
    ///
    /// # Errors
    /// Fails only if the worker thread cannot be started.
    pub fn build(self) -> Result<ExpiringCache<K, V>> {
        ExpiringCache::new(self.ttl)
    }
}

//! Cache Module
//!
//! In-memory caching with deadline-driven TTL expiration.

use std::time::Duration;

mod builder;
mod entry;
mod expiring;
mod scheduler;
mod stats;
mod store;


// Re-export public types
pub use builder::CacheBuilder;
pub use entry::{CacheEntry, ExpiryRecord};
pub use expiring::ExpiringCache;
pub use scheduler::ExpiryScheduler;
pub use stats::{CacheStats, StatsCounters};
pub use store::ConcurrentStore;

// == Public Constants ==
/// Maximum key length in bytes accepted over HTTP
pub const MAX_KEY_LENGTH: usize = 256;

/// TTL in whole milliseconds, saturating at `u64::MAX`.
pub fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}

// == Cache Trait ==
/// Key-value cache contract.
///
/// All operations take `&self`; implementations synchronize internally.
pub trait Cache<K, V> {
    /// Stores `value` under `key`. `None` removes the key.
    fn add(&self, key: K, value: Option<V>);

    /// Removes `key`. Missing keys are a no-op.
    fn remove(&self, key: &K);

    /// Returns the current value for `key`.
    fn get(&self, key: &K) -> Option<V>;

    /// Removes every entry.
    fn clear(&self);

    /// Number of entries.
    fn size(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_millis_saturates() {
        assert_eq!(ttl_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(ttl_millis(Duration::MAX), u64::MAX);
    }
}

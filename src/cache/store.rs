//! Cache Store Module
//!
//! Thread-safe key-value storage backed by a sharded concurrent map.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::cache::CacheEntry;

// == Concurrent Store ==
/// Concurrent key-value storage.
///
/// Every operation is individually atomic per key; there is no transaction
/// spanning several keys. Writers only contend with other operations on the
/// same shard.
#[derive(Debug)]
pub struct ConcurrentStore<K, V>
where
    K: Hash + Eq,
{
    /// Key-value storage, each value tagged with its write stamp
    entries: DashMap<K, CacheEntry<V>>,
    /// Source of write stamps
    next_stamp: AtomicU64,
}

impl<K, V> ConcurrentStore<K, V>
where
    K: Hash + Eq,
{
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next_stamp: AtomicU64::new(1),
        }
    }

    // == Put ==
    /// Inserts or overwrites `key`.
    ///
    /// `None` removes the key instead of storing an absent value. Returns the
    /// stamp of the new write, or `None` when the call was a removal.
    pub fn put(&self, key: K, value: Option<V>) -> Option<u64> {
        match value {
            Some(value) => {
                let stamp = self.next_stamp.fetch_add(1, Ordering::Relaxed);
                self.entries.insert(key, CacheEntry::new(value, stamp));
                Some(stamp)
            }
            None => {
                self.entries.remove(&key);
                None
            }
        }
    }

    // == Get ==
    /// Returns a clone of the current value for `key`.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Remove ==
    /// Removes `key` if present. Returns whether anything was removed.
    pub fn remove(&self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Remove If Stamp ==
    /// Removes `key` only if it still holds the write identified by `stamp`.
    pub fn remove_if_stamp(&self, key: &K, stamp: u64) -> bool {
        self.entries
            .remove_if(key, |_, entry| entry.stamp == stamp)
            .is_some()
    }

    // == Clear ==
    /// Removes every entry.
    ///
    /// Shards are cleared one at a time, so a put racing with `clear` may or
    /// may not survive it.
    pub fn clear(&self) {
        self.entries.clear();
    }

    // == Size ==
    /// Number of entries. Approximate while writers are active.
    pub fn size(&self) -> u64 {
        self.entries.len() as u64
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> Default for ConcurrentStore<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

//! Separate-chaining hash table with a fixed number of buckets.
//!
//! Lookups are O(1) on average and degrade to O(n) when keys collide.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

/// Number of buckets allocated on first insert
const BUCKETS: usize = 100;

/// Single-threaded hash map resolving collisions by chaining.
#[derive(Debug, Clone)]
pub struct ChainedHashMap<K, V> {
    /// Allocated lazily on the first `put`
    buckets: Vec<Vec<(K, V)>>,
    len: usize,
    hasher: RandomState,
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Hash + Eq,
{
    pub fn new() -> Self {
        Self {
            buckets: Vec::new(),
            len: 0,
            hasher: RandomState::new(),
        }
    }

    fn bucket_index(&self, key: &K) -> usize {
        (self.hasher.hash_one(key) % BUCKETS as u64) as usize
    }

    /// Inserts or overwrites `key`, returning the previous value.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if self.buckets.is_empty() {
            self.buckets.resize_with(BUCKETS, Vec::new);
        }

        let index = self.bucket_index(&key);
        let chain = &mut self.buckets[index];
        match chain.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                chain.push((key, value));
                self.len += 1;
                None
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        if self.buckets.is_empty() {
            return None;
        }
        self.buckets[self.bucket_index(key)]
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Removes `key`, returning its value. Missing keys are a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        if self.buckets.is_empty() {
            return None;
        }
        let index = self.bucket_index(key);
        let chain = &mut self.buckets[index];
        let position = chain.iter().position(|(k, _)| k == key)?;
        self.len -= 1;
        Some(chain.swap_remove(position).1)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<K, V> Default for ChainedHashMap<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

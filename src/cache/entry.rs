//! Cache Entry Module
//!
//! Defines stored entries and the expiry records that track their deadlines.

use std::cmp::Ordering;
use std::time::Instant;

// == Cache Entry ==
/// A value held by the store, tagged with the stamp of the write that put it there.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Write stamp, unique per successful put
    pub stamp: u64,
}

impl<V> CacheEntry<V> {
    /// Creates a new entry for the given write.
    pub fn new(value: V, stamp: u64) -> Self {
        Self { value, stamp }
    }
}

// == Expiry Record ==
/// A scheduled (key, deadline) pair awaiting the expiry worker.
///
/// Records are ordered by deadline only. Two records with the same deadline
/// compare equal regardless of key.
#[derive(Debug, Clone)]
pub struct ExpiryRecord<K> {
    /// Key to expire
    pub key: K,
    /// Stamp of the write this record belongs to
    pub stamp: u64,
    /// Monotonic instant at which the entry becomes eligible for removal
    pub deadline: Instant,
}

impl<K> ExpiryRecord<K> {
    /// Creates a new expiry record.
    pub fn new(key: K, stamp: u64, deadline: Instant) -> Self {
        Self {
            key,
            stamp,
            deadline,
        }
    }

    // == Is Due ==
    /// Returns true once `now` has reached the deadline.
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline <= now
    }
}

impl<K> PartialEq for ExpiryRecord<K> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline
    }
}

impl<K> Eq for ExpiryRecord<K> {}

impl<K> PartialOrd for ExpiryRecord<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for ExpiryRecord<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline.cmp(&other.deadline)
    }
}

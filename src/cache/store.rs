//! Cache Store Module
//!
//! Main cache engine combining insertion-ordered storage with FIFO eviction
//! and TTL expiration. The store is synchronous and not thread-safe by
//! itself; [`crate::TtlCache`] wraps it in a mutex.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::cache::entry::{current_timestamp_secs, is_expired};
use crate::cache::{CacheStats, ExpiryIndex, InsertionOrder, Ttl};
use crate::error::Result;

// == Cache Store ==
/// Main cache storage with FIFO eviction and TTL support.
///
/// Every key in `expiry` is also in `values`; a value may have no TTL.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    values: HashMap<String, V>,
    /// Insertion order of `values`, oldest first
    order: InsertionOrder,
    /// Deadlines for the entries that carry a TTL
    expiry: ExpiryIndex,
    stats: CacheStats,
    /// Maximum number of entries, `None` = unbounded
    max_size: Option<usize>,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store holding at most `max_size` entries.
    pub fn new(max_size: Option<usize>) -> Self {
        Self {
            values: HashMap::new(),
            order: InsertionOrder::new(),
            expiry: ExpiryIndex::new(),
            stats: CacheStats::new(),
            max_size,
        }
    }

    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }

    // == Set ==
    /// Stores a key-value pair with an optional TTL in seconds.
    ///
    /// `None` means the entry never expires and clears any earlier TTL.
    /// A negative TTL is rejected with `InvalidArgument` before anything
    /// is mutated.
    pub fn set(&mut self, key: String, value: V, ttl: Option<i64>) -> Result<()> {
        self.set_at(key, value, ttl, current_timestamp_secs())
    }

    pub(crate) fn set_at(
        &mut self,
        key: String,
        value: V,
        ttl: Option<i64>,
        now: i64,
    ) -> Result<()> {
        let ttl = ttl.map(Ttl::try_from).transpose()?;
        self.insert_at(key, value, ttl, now);
        Ok(())
    }

    // == Insert ==
    /// Stores a key-value pair with an already validated TTL.
    pub fn insert(&mut self, key: String, value: V, ttl: Option<Ttl>) {
        self.insert_at(key, value, ttl, current_timestamp_secs());
    }

    /// Applies a write in this order: record or clear the TTL, drop the old
    /// value so the key loses its FIFO position, evict the oldest entry if
    /// still at capacity, then append the key as the newest entry.
    pub(crate) fn insert_at(&mut self, key: String, value: V, ttl: Option<Ttl>, now: i64) {
        if self.max_size == Some(0) {
            debug!(key = %key, "Cache has zero capacity, dropping write");
            return;
        }

        match ttl {
            Some(ttl) => self.expiry.insert(&key, ttl.deadline_from(now)),
            None => {
                self.expiry.remove(&key);
            }
        }

        if self.values.remove(&key).is_some() {
            self.order.remove(&key);
        }

        if let Some(max) = self.max_size {
            if self.values.len() >= max {
                self.evict_oldest();
            }
        }

        self.values.insert(key.clone(), value);
        self.order.push(key);
        self.stats.set_total_entries(self.values.len());
    }

    // == Evict Oldest ==
    /// Drops the longest-resident entry regardless of its TTL.
    fn evict_oldest(&mut self) {
        if let Some(evicted) = self.order.pop_oldest() {
            self.values.remove(&evicted);
            self.expiry.remove(&evicted);
            self.stats.record_eviction();
            debug!(key = %evicted, "Evicted oldest entry to stay within capacity");
        }
    }

    // == Delete ==
    /// Removes an entry by key, returning whether it existed.
    pub fn delete(&mut self, key: &str) -> bool {
        let existed = self.remove_entry(key);
        self.stats.set_total_entries(self.values.len());
        existed
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        self.expiry.remove(key);
        if self.values.remove(key).is_some() {
            self.order.remove(key);
            true
        } else {
            false
        }
    }

    // == Collect Garbage ==
    /// Removes every entry whose deadline has been reached.
    ///
    /// Returns the number of entries removed. Entries without a TTL are
    /// never touched.
    pub fn collect_garbage(&mut self) -> usize {
        self.collect_garbage_at(current_timestamp_secs())
    }

    /// Holds the lock for one pass over the insertion order, however many
    /// keys are due.
    pub(crate) fn collect_garbage_at(&mut self, now: i64) -> usize {
        self.stats.record_gc_run();
        if self.expiry.is_empty() {
            return 0;
        }

        if self.expiry.resort() {
            debug!(tracked = self.expiry.len(), "Resorted expiry queue");
        }

        let expired: HashSet<String> = self.expiry.drain_expired(now).into_iter().collect();
        for key in &expired {
            self.values.remove(key);
        }
        self.order.remove_all(&expired);

        self.stats.record_expirations(expired.len());
        self.stats.set_total_entries(self.values.len());
        expired.len()
    }

    // == Contains Key ==
    /// Returns true if `key` holds a live entry. Does not evict or count.
    pub fn contains_key(&self, key: &str) -> bool {
        self.contains_key_at(key, current_timestamp_secs())
    }

    pub(crate) fn contains_key_at(&self, key: &str, now: i64) -> bool {
        self.values.contains_key(key) && !self.is_expired_at(key, now)
    }

    fn is_expired_at(&self, key: &str, now: i64) -> bool {
        self.expiry
            .deadline(key)
            .is_some_and(|expires_at| is_expired(expires_at, now))
    }

    // == Time To Live ==
    /// Returns the remaining TTL of a live entry in seconds.
    ///
    /// `None` if the key is absent, already expired, or never expires.
    pub fn ttl_remaining(&self, key: &str) -> Option<u64> {
        self.ttl_remaining_at(key, current_timestamp_secs())
    }

    pub(crate) fn ttl_remaining_at(&self, key: &str, now: i64) -> Option<u64> {
        let expires_at = self.expiry.deadline(key)?;
        if is_expired(expires_at, now) {
            return None;
        }
        u64::try_from(expires_at - now).ok()
    }

    // == Keys ==
    /// Returns live keys from oldest to newest insertion.
    pub fn keys(&self) -> Vec<String> {
        self.keys_at(current_timestamp_secs())
    }

    pub(crate) fn keys_at(&self, now: i64) -> Vec<String> {
        self.order
            .iter()
            .filter(|key| !self.is_expired_at(key, now))
            .cloned()
            .collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.values.len());
        stats
    }

    // == Length ==
    /// Returns the number of stored entries.
    ///
    /// Expired entries that neither a read nor a sweep has reached yet are
    /// still counted.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of entries that carry a TTL.
    pub fn ttl_count(&self) -> usize {
        self.expiry.len()
    }

    // == Clear ==
    /// Drops every entry and every TTL. Statistics counters are kept.
    pub fn clear(&mut self) {
        self.values.clear();
        self.order.clear();
        self.expiry.clear();
        self.stats.set_total_entries(0);
    }

    /// True while the expiry queue may be out of deadline order.
    pub fn needs_resort(&self) -> bool {
        self.expiry.needs_resort()
    }

    /// Returns true when the expiry queue is ascending by deadline.
    ///
    /// The sweep depends on this whenever `needs_resort()` is false.
    pub fn expiry_order_is_sorted(&self) -> bool {
        self.expiry.is_sorted()
    }

    /// Checks the structural invariants. Test-only.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        for key in self.expiry.keys() {
            assert!(self.values.contains_key(key), "orphaned TTL for {}", key);
        }
        assert_eq!(self.order.len(), self.values.len());
        assert!(self.order.iter().all(|k| self.values.contains_key(k)));
        if let Some(max) = self.max_size {
            assert!(self.values.len() <= max);
        }
        if !self.expiry.needs_resort() {
            assert!(self.expiry.is_sorted());
        }
    }
}

impl<V: Clone> CacheStore<V> {
    // == Get ==
    /// Retrieves a value by key.
    ///
    /// An entry whose deadline has passed is removed on the spot and
    /// reported as absent, even if no sweep has run yet.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, current_timestamp_secs())
    }

    pub(crate) fn get_at(&mut self, key: &str, now: i64) -> Option<V> {
        if !self.values.contains_key(key) {
            self.stats.record_miss();
            return None;
        }

        if self.is_expired_at(key, now) {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            self.stats.set_total_entries(self.values.len());
            return None;
        }

        self.stats.record_hit();
        self.values.get(key).cloned()
    }
}

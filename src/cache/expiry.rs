//! Expiry Index Module
//!
//! Maps keys to absolute expiry deadlines and keeps them in an order that
//! lets a sweep stop at the first live entry.

use std::collections::{HashMap, VecDeque};

// == Expiry Index ==
/// Deadlines for every entry that carries a TTL.
///
/// New deadlines are appended to the back of `queue`, so after a `set` the
/// queue may no longer be ascending. `needs_resort` records that. While the
/// flag is clear, iterating `queue` yields non-decreasing deadlines.
#[derive(Debug, Default)]
pub struct ExpiryIndex {
    /// Key -> absolute expiry (Unix seconds)
    deadlines: HashMap<String, i64>,
    /// Sweep order, ascending by deadline when `needs_resort` is false
    queue: VecDeque<String>,
    needs_resort: bool,
}

impl ExpiryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert ==
    /// Records (or replaces) the deadline for `key` and marks the queue as
    /// possibly unsorted.
    pub fn insert(&mut self, key: &str, expires_at: i64) {
        if self.deadlines.insert(key.to_string(), expires_at).is_some() {
            self.remove_from_queue(key);
        }
        self.queue.push_back(key.to_string());
        self.needs_resort = true;
    }

    // == Remove ==
    /// Drops the deadline for `key`, returning it if one was set.
    ///
    /// Removing never breaks the ordering, so the dirty flag is untouched.
    pub fn remove(&mut self, key: &str) -> Option<i64> {
        let removed = self.deadlines.remove(key);
        if removed.is_some() {
            self.remove_from_queue(key);
        }
        removed
    }

    fn remove_from_queue(&mut self, key: &str) {
        if let Some(pos) = self.queue.iter().position(|k| k == key) {
            self.queue.remove(pos);
        }
    }

    /// Returns the deadline for `key`, if it carries a TTL.
    pub fn deadline(&self, key: &str) -> Option<i64> {
        self.deadlines.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    pub fn needs_resort(&self) -> bool {
        self.needs_resort
    }

    // == Resort ==
    /// Sorts the queue by deadline if it is marked dirty.
    ///
    /// Full sort, not incremental. Returns whether a sort happened.
    pub fn resort(&mut self) -> bool {
        if !self.needs_resort {
            return false;
        }
        let deadlines = &self.deadlines;
        self.queue
            .make_contiguous()
            .sort_by_key(|k| deadlines.get(k).copied().unwrap_or(i64::MAX));
        self.needs_resort = false;
        true
    }

    // == Drain Expired ==
    /// Removes and returns every key whose deadline is at or before `now`.
    ///
    /// Stops at the first deadline still in the future, so the queue must be
    /// sorted: call [`ExpiryIndex::resort`] first.
    pub fn drain_expired(&mut self, now: i64) -> Vec<String> {
        debug_assert!(!self.needs_resort, "drain_expired on an unsorted queue");

        let mut expired = Vec::new();
        while let Some(front) = self.queue.front() {
            match self.deadlines.get(front) {
                Some(&expires_at) if expires_at > now => break,
                _ => {}
            }
            if let Some(key) = self.queue.pop_front() {
                self.deadlines.remove(&key);
                expired.push(key);
            }
        }
        expired
    }

    /// Returns true when the queue really is ascending by deadline.
    ///
    /// Whenever `needs_resort()` is false this must hold.
    pub fn is_sorted(&self) -> bool {
        let mut previous = i64::MIN;
        for key in &self.queue {
            let Some(&expires_at) = self.deadlines.get(key) else {
                return false;
            };
            if expires_at < previous {
                return false;
            }
            previous = expires_at;
        }
        true
    }

    /// Iterates tracked keys in sweep order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.queue.iter()
    }

    pub fn clear(&mut self) {
        self.deadlines.clear();
        self.queue.clear();
        self.needs_resort = false;
    }
}

//! Insertion Order Module
//!
//! Tracks insertion order for FIFO eviction.

use std::collections::{HashSet, VecDeque};

// == Insertion Order ==
/// Tracks the order in which keys were (re)inserted.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest insertion (next to be evicted)
/// - Back = Newest insertion
///
/// Reads never reorder keys; only a fresh insertion moves a key to the back.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: VecDeque<String>,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Push ==
    /// Records `key` as the newest insertion.
    ///
    /// Callers remove an existing occurrence first; the tracker does not
    /// deduplicate on its own.
    pub fn push(&mut self, key: String) {
        self.order.push_back(key);
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    /// Removes every key in `keys` with a single pass over the tracker.
    pub fn remove_all(&mut self, keys: &HashSet<String>) {
        if keys.is_empty() {
            return;
        }
        self.order.retain(|k| !keys.contains(k));
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest key.
    ///
    /// Returns None if tracker is empty.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    /// Iterates keys from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}

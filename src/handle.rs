//! Cache Handle
//!
//! The public, thread-safe face of the cache: owns the store behind a single
//! mutex and owns the background GC task that sweeps it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CacheStore, Ttl};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::spawn_gc_task;

/// Thread-safe TTL cache with periodic garbage collection.
///
/// Every operation takes the same exclusive lock, so concurrent callers see
/// some serial interleaving of their operations. Share a cache between tasks
/// or threads with `Arc<TtlCache<V>>`.
///
/// Dropping the handle aborts the GC task and clears the store. The task only
/// holds a weak reference, so a sweep that is mid-flight during teardown
/// either finishes first or finds nothing left to do.
#[derive(Debug)]
pub struct TtlCache<V = String> {
    store: Arc<Mutex<CacheStore<V>>>,
    gc_task: Option<JoinHandle<()>>,
    gc_interval: Duration,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + 'static,
{
    /// Creates a cache swept every `gc_interval_ms` milliseconds and holding
    /// at most `max_size` entries (`None` = unbounded).
    ///
    /// Fails with `InvalidArgument` if `gc_interval_ms` is zero, or if no
    /// tokio runtime is running to host the GC task.
    pub fn new(gc_interval_ms: u64, max_size: Option<usize>) -> Result<Self> {
        Self::from_config(&CacheConfig::new(gc_interval_ms, max_size))
    }

    /// Creates a cache from a [`CacheConfig`].
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Handle::try_current().map_err(|_| {
            warn!("Rejecting cache construction outside a tokio runtime");
            CacheError::invalid_argument("TtlCache must be created inside a tokio runtime")
        })?;

        let gc_interval = Duration::from_millis(config.gc_interval_ms);
        let store = Arc::new(Mutex::new(CacheStore::new(config.max_size)));
        let gc_task = spawn_gc_task(Arc::downgrade(&store), gc_interval);

        info!(
            gc_interval_ms = config.gc_interval_ms,
            max_size = ?config.max_size,
            "Cache initialized"
        );

        Ok(Self {
            store,
            gc_task: Some(gc_task),
            gc_interval,
        })
    }
}

impl<V: Clone> TtlCache<V> {
    /// Returns the value for `key`, or `None` if it is absent or expired.
    pub fn get(&self, key: &str) -> Option<V> {
        self.lock().get(key)
    }
}

impl<V> TtlCache<V> {
    fn lock(&self) -> MutexGuard<'_, CacheStore<V>> {
        // Store methods never panic halfway through a mutation
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `value` under `key`. `ttl` is in whole seconds; `None` means the
    /// entry never expires.
    ///
    /// Fails with `InvalidArgument` for a negative TTL, leaving the cache
    /// untouched.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<i64>) -> Result<()> {
        self.lock().set(key.into(), value, ttl)
    }

    /// Stores `value` under `key` with an already validated TTL.
    pub fn insert(&self, key: impl Into<String>, value: V, ttl: Option<Ttl>) {
        self.lock().insert(key.into(), value, ttl);
    }

    /// Removes `key`, returning whether it existed.
    pub fn delete(&self, key: &str) -> bool {
        self.lock().delete(key)
    }

    /// Returns true if `key` holds a live entry, without evicting anything.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Remaining TTL of a live entry in seconds; `None` if absent, expired or
    /// without TTL.
    pub fn ttl_remaining(&self, key: &str) -> Option<u64> {
        self.lock().ttl_remaining(key)
    }

    /// Live keys from oldest to newest insertion.
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys()
    }

    /// Number of stored entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    /// Runs a sweep immediately, returning the number of entries reclaimed.
    /// The background task calls the same code on every tick.
    pub fn collect_garbage(&self) -> usize {
        self.lock().collect_garbage()
    }

    pub fn gc_interval(&self) -> Duration {
        self.gc_interval
    }

    pub fn max_size(&self) -> Option<usize> {
        self.lock().max_size()
    }

    /// Stops the GC task, waits for it to finish, and clears the store.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.gc_task.take() {
            task.abort();
            // A cancelled JoinError is the expected outcome
            let _ = task.await;
        }
        self.lock().clear();
        info!("Cache shut down");
    }
}

impl<V> Drop for TtlCache<V> {
    fn drop(&mut self) {
        if let Some(task) = self.gc_task.take() {
            task.abort();
            debug!("Cache GC task aborted");
        }
        self.lock().clear();
    }
}

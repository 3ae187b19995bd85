//! Garbage Collection Task
//!
//! Background task that periodically sweeps expired cache entries.

use std::sync::{Mutex, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that calls `collect_garbage` on the store once
/// per `interval`.
///
/// The task holds only a weak reference: it never keeps the store alive and
/// exits on its own at the first tick after the store is gone. The owner
/// should still abort the returned handle at teardown so no further tick is
/// awaited.
///
/// # Panics
/// Must be called from within a tokio runtime.
pub fn spawn_gc_task<V>(store: Weak<Mutex<CacheStore<V>>>, interval: Duration) -> JoinHandle<()>
where
    V: Send + 'static,
{
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "Starting cache GC task");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let Some(strong) = store.upgrade() else {
                info!("Cache dropped, stopping GC task");
                break;
            };

            let (removed, remaining) = {
                let mut guard = strong.lock().unwrap_or_else(PoisonError::into_inner);
                let removed = guard.collect_garbage();
                (removed, guard.len())
            };
            drop(strong);

            if removed > 0 {
                info!(removed, remaining, "Cache GC: removed expired entries");
            } else {
                debug!(remaining, "Cache GC: no expired entries found");
            }
        }
    })
}

//! TTL Cache - an in-process, size-bounded key/value cache
//!
//! Entries may carry a whole-second TTL. Expired entries are never returned:
//! reads evict them lazily and a background task sweeps them in bulk. When
//! the cache is full the oldest insertion is evicted (FIFO).
//!
//! ```no_run
//! # async fn demo() -> ttl_cache::Result<()> {
//! use ttl_cache::TtlCache;
//!
//! let cache: TtlCache = TtlCache::new(5000, Some(2))?;
//! cache.set("a", "1".to_string(), None)?;
//! cache.set("b", "2".to_string(), Some(60))?;
//! cache.set("c", "3".to_string(), None)?;
//!
//! assert_eq!(cache.get("a"), None);
//! assert_eq!(cache.get("b").as_deref(), Some("2"));
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod handle;
pub mod tasks;

pub use cache::{CacheStats, CacheStore, Ttl};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use handle::TtlCache;
pub use tasks::spawn_gc_task;

//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and FIFO eviction.

mod entry;
mod expiry;
mod order;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_secs, Ttl};
pub use expiry::ExpiryIndex;
pub use order::InsertionOrder;
pub use stats::CacheStats;
pub use store::CacheStore;

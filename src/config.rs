//! Configuration Module
//!
//! Handles loading and validating cache configuration.

use std::env;

use tracing::warn;

use crate::error::{CacheError, Result};

/// Default interval between background sweeps, in milliseconds.
pub const DEFAULT_GC_INTERVAL_MS: u64 = 5000;

/// Cache configuration parameters.
///
/// Values can be loaded from environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Interval between background garbage collection sweeps, in milliseconds
    pub gc_interval_ms: u64,
    /// Maximum number of entries, `None` = unbounded
    pub max_size: Option<usize>,
}

impl CacheConfig {
    /// Creates a config with the given sweep interval and size bound.
    pub fn new(gc_interval_ms: u64, max_size: Option<usize>) -> Self {
        Self {
            gc_interval_ms,
            max_size,
        }
    }

    /// Sets the sweep interval.
    pub fn with_gc_interval_ms(mut self, gc_interval_ms: u64) -> Self {
        self.gc_interval_ms = gc_interval_ms;
        self
    }

    /// Sets the maximum number of entries.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_GC_INTERVAL_MS` - Sweep interval in milliseconds (default: 5000)
    /// - `CACHE_MAX_SIZE` - Maximum entries (default: unbounded)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self {
            gc_interval_ms: env::var("CACHE_GC_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_GC_INTERVAL_MS),
            max_size: env::var("CACHE_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Checks that the sweep interval is at least one millisecond.
    pub fn validate(&self) -> Result<()> {
        if self.gc_interval_ms == 0 {
            warn!("Rejecting cache config with gc_interval_ms = 0");
            return Err(CacheError::invalid_argument(
                "gc_interval_ms must be at least 1",
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            gc_interval_ms: DEFAULT_GC_INTERVAL_MS,
            max_size: None,
        }
    }
}

//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Missing, expired and evicted keys are ordinary results (`None`, `false`),
/// never errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A caller supplied a value outside the accepted domain, such as a
    /// negative TTL or a zero GC interval. Nothing was mutated.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CacheError {
    /// Shorthand for building an `InvalidArgument` error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        CacheError::InvalidArgument(msg.into())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

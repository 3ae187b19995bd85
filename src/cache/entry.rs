//! Cache Entry Module
//!
//! TTL arguments and the whole-second clock that expiry deadlines are
//! measured against.

use chrono::Utc;

use crate::error::{CacheError, Result};

// == Ttl ==
/// A validated time-to-live: a non-negative whole number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ttl(u64);

impl Ttl {
    /// Creates a TTL from an unsigned second count. Always valid.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Returns the TTL in seconds.
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    // == Deadline ==
    /// Returns the absolute expiry instant for an entry written at `now`.
    pub fn deadline_from(self, now: i64) -> i64 {
        let secs = i64::try_from(self.0).unwrap_or(i64::MAX);
        now.saturating_add(secs)
    }
}

impl TryFrom<i64> for Ttl {
    type Error = CacheError;

    fn try_from(secs: i64) -> Result<Self> {
        u64::try_from(secs).map(Ttl).map_err(|_| {
            CacheError::invalid_argument(format!("ttl must be non-negative, got {}", secs))
        })
    }
}

impl TryFrom<f64> for Ttl {
    type Error = CacheError;

    /// Accepts only finite, non-negative, integral values such as `30.0`.
    fn try_from(secs: f64) -> Result<Self> {
        if !secs.is_finite() || secs.fract() != 0.0 {
            return Err(CacheError::invalid_argument(format!(
                "ttl must be a whole number of seconds, got {}",
                secs
            )));
        }
        if secs < 0.0 {
            return Err(CacheError::invalid_argument(format!(
                "ttl must be non-negative, got {}",
                secs
            )));
        }
        if secs > u64::MAX as f64 {
            return Err(CacheError::invalid_argument(format!(
                "ttl is out of range, got {}",
                secs
            )));
        }
        Ok(Ttl(secs as u64))
    }
}

// == Expiry Check ==
/// An entry with deadline `expires_at` is expired once `now` has moved
/// strictly past it. A zero TTL therefore stays readable until the current
/// second ends.
pub fn is_expired(expires_at: i64, now: i64) -> bool {
    now > expires_at
}

// == Utility Functions ==
/// Returns the current Unix timestamp in whole seconds.
pub fn current_timestamp_secs() -> i64 {
    Utc::now().timestamp()
}

//! Timestamped cache entries.

use std::time::Duration;
use tokio::time::Instant;

/// A cached value paired with the instant it was loaded.
///
/// Uses the tokio clock so freshness can be driven by a paused runtime in tests.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub loaded_at: Instant,
}

impl<T> CacheEntry<T> {
    /// Wraps a value loaded now.
    pub fn new(value: T) -> Self {
        Self {
            value,
            loaded_at: Instant::now(),
        }
    }

    pub fn age(&self) -> Duration {
        self.loaded_at.elapsed()
    }

    /// Returns true while the entry is younger than `ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

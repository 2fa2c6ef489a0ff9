//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with age tracking.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with its value and insertion instant.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Instant the entry was written
    pub timestamp: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current instant.
    pub fn new(value: V) -> Self {
        Self {
            value,
            timestamp: Instant::now(),
        }
    }

    // == Age ==
    /// Time elapsed since the entry was written.
    pub fn age(&self) -> Duration {
        self.timestamp.elapsed()
    }

    // == Is Expired ==
    /// Checks if the entry is stale under the given TTL.
    ///
    /// Boundary condition: an entry whose age is greater than or equal to the
    /// TTL is expired, so a zero TTL expires every entry immediately.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }

    // == Time To Live ==
    /// Remaining lifetime under the given TTL, saturating at zero.
    pub fn ttl_remaining(&self, ttl: Duration) -> Duration {
        ttl.saturating_sub(self.age())
    }
}

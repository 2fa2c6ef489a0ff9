//! Cache Store Module
//!
//! Expiring key/value store. The TTL is fixed when the cache is built and
//! stale entries are evicted lazily on access or eagerly by `clear_expired`.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats};

// == TTL Cache ==
/// Key/value storage where every entry shares a single time-to-live.
///
/// The cache performs no internal locking; callers sharing it across tasks
/// must serialize access (see `CorpusService`).
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Maximum entry age
    ttl: Duration,
    /// Hit/miss counters
    stats: CacheStats,
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            stats: CacheStats::new(),
        }
    }

    /// Creates an empty cache with a TTL given in whole seconds.
    pub fn with_ttl_secs(ttl_secs: u64) -> Self {
        Self::new(Duration::from_secs(ttl_secs))
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `None` if the key is absent or stale. A stale entry is removed
    /// as a side effect, so it no longer counts towards `size()`.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(self.ttl),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.entries.remove(key);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Reads a live value without touching the counters or evicting.
    pub fn peek(&self, key: &str) -> Option<V> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(self.ttl))
            .map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores a value, replacing any existing entry and resetting its age.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), CacheEntry::new(value));
    }

    // == Clear ==
    /// Removes every entry. Returns the number of entries removed.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Clear Expired ==
    /// Removes all stale entries regardless of access.
    ///
    /// Returns the number of entries removed.
    pub fn clear_expired(&mut self) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(ttl));
        before - self.entries.len()
    }

    // == Size ==
    /// Current number of stored entries, stale ones included until swept.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The TTL shared by every entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Stats ==
    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_entry_count(self.entries.len());
        stats.ttl_seconds = self.ttl.as_secs();
        stats
    }
}

//! Cache Module
//!
//! Provides an in-memory key/value store with a fixed time-to-live.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::TtlCache;

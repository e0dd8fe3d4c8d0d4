//! Cache Module
//!
//! Object-record cache with per-entry expiry and LRU eviction, consulted by
//! the caching bucket in front of every stat.

mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::bucket::Object;

// Re-export public types
pub use entry::StatEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::LruStatCache;

// == Public Constants ==
/// Default number of records held before LRU eviction kicks in
pub const DEFAULT_CAPACITY: usize = 4096;

// == Stat Cache Trait ==
/// A bounded map from object name to a record that is valid until an
/// expiration time.
///
/// Implementations are not synchronized; callers serialize access.
pub trait StatCache: Send {
    /// Caches `object` under its name until `expiration`.
    ///
    /// An entry already holding a newer record (see
    /// [`Object::is_newer_than`]) is kept instead.
    fn insert(&mut self, object: Arc<Object>, expiration: DateTime<Utc>);

    /// Returns the record for `name` if present and `now < expiration`.
    fn look_up(&mut self, name: &str, now: DateTime<Utc>) -> Option<Arc<Object>>;

    /// Drops any entry for `name`. Erasing an absent name is a no-op.
    fn erase(&mut self, name: &str);

    /// Drops up to `limit` entries expired at `now`, soonest expiration
    /// first, returning how many were removed.
    fn purge_expired(&mut self, now: DateTime<Utc>, limit: usize) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn stats(&self) -> CacheStats;

    /// Panics if internal structure is inconsistent.
    fn check_invariants(&self);
}

//! LRU Stat Cache Module
//!
//! Stat cache engine combining HashMap storage with LRU tracking and
//! per-entry expiration.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::bucket::Object;
use crate::cache::{CacheStats, LruTracker, StatCache, StatEntry};

// == LRU Stat Cache ==
/// Capacity-bounded stat cache evicting the least recently used entry.
#[derive(Debug)]
pub struct LruStatCache {
    /// Object name to entry
    entries: HashMap<String, StatEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Entries ordered by expiration, soonest first
    expirations: BTreeSet<(DateTime<Utc>, String)>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl LruStatCache {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` records.
    ///
    /// # Panics
    /// If `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "stat cache capacity must be positive");

        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            expirations: BTreeSet::new(),
            stats: CacheStats::new(),
            capacity,
        }
    }

    fn remove(&mut self, name: &str) -> Option<StatEntry> {
        let removed = self.entries.remove(name)?;
        self.lru.remove(name);
        self.expirations.remove(&(removed.expiration, name.to_string()));
        self.stats.set_total_entries(self.entries.len());
        Some(removed)
    }
}

impl StatCache for LruStatCache {
    // == Insert ==
    fn insert(&mut self, object: Arc<Object>, expiration: DateTime<Utc>) {
        let is_overwrite = match self.entries.get(&object.name) {
            Some(existing) if existing.object.is_newer_than(&object) => return,
            Some(existing) => {
                let key = (existing.expiration, object.name.clone());
                self.expirations.remove(&key);
                true
            }
            None => false,
        };

        // If not overwriting and at capacity, evict oldest entry
        if !is_overwrite && self.entries.len() >= self.capacity {
            if let Some(evicted) = self.lru.evict_oldest() {
                if let Some(entry) = self.entries.remove(&evicted) {
                    self.expirations.remove(&(entry.expiration, evicted));
                }
                self.stats.record_eviction();
            }
        }

        let name = object.name.clone();
        self.lru.touch(&name);
        self.expirations.insert((expiration, name.clone()));
        self.entries.insert(name, StatEntry::new(object, expiration));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Look Up ==
    /// Expired entries are removed and counted as misses.
    fn look_up(&mut self, name: &str, now: DateTime<Utc>) -> Option<Arc<Object>> {
        let Some(entry) = self.entries.get(name) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired(now) {
            self.remove(name);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        let object = entry.object.clone();
        self.stats.record_hit();
        self.lru.touch(name);
        Some(object)
    }

    // == Erase ==
    fn erase(&mut self, name: &str) {
        self.remove(name);
    }

    // == Purge Expired ==
    /// Walks the expiration index from the soonest entry, so the work done
    /// is proportional to `limit`, not to the cache size.
    fn purge_expired(&mut self, now: DateTime<Utc>, limit: usize) -> usize {
        let mut removed = 0;
        while removed < limit {
            let name = match self.expirations.first() {
                Some((expiration, name)) if *expiration <= now => name.clone(),
                _ => break,
            };
            self.remove(&name);
            removed += 1;
        }

        self.stats.record_expirations(removed);
        removed
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Check Invariants ==
    fn check_invariants(&self) {
        assert!(
            self.entries.len() <= self.capacity,
            "stat cache holds {} entries, capacity {}",
            self.entries.len(),
            self.capacity
        );
        assert_eq!(
            self.entries.len(),
            self.lru.len(),
            "stat cache and LRU tracker disagree on size"
        );
        assert_eq!(
            self.entries.len(),
            self.expirations.len(),
            "stat cache and expiration index disagree on size"
        );
        assert!(self.lru.is_consistent(), "LRU tracker indexes diverged");

        for (name, entry) in &self.entries {
            assert_eq!(
                name, &entry.object.name,
                "entry keyed under a different object's name"
            );
            assert!(self.lru.contains(name), "entry {name:?} missing from LRU tracker");
            assert!(
                self.expirations.contains(&(entry.expiration, name.clone())),
                "entry {name:?} missing from expiration index"
            );
        }
    }
}

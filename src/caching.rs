//! Caching Bucket Module
//!
//! A bucket that remembers object records returned by the bucket it wraps.
//! Records are refreshed or dropped whenever a mutation passes through this
//! bucket, and expire after a fixed TTL so that changes made elsewhere are
//! eventually seen.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::bucket::{
    Bucket, CreateObjectRequest, ListObjectsRequest, Listing, Object, ObjectReader,
    ReadObjectRequest, StatObjectRequest, UpdateObjectRequest,
};
use crate::cache::{CacheStats, StatCache};
use crate::clock::Clock;
use crate::error::Result;
use crate::sync::InvariantMutex;

/// Most expired entries dropped per lock acquisition while purging
const PURGE_BATCH: usize = 256;

// == Cache State ==
/// Everything guarded by the cache lock.
struct CacheState {
    cache: Box<dyn StatCache>,
    /// Count of successful mutations applied through this bucket. A stat or
    /// write only caches its record if no other mutation landed while it
    /// was in flight.
    mutations: u64,
}

fn check_state(state: &CacheState) {
    state.cache.check_invariants();
}

// == Caching Bucket ==
/// Bucket decorator caching stat results.
///
/// Only `stat_object` reads from the cache. `create_object` and
/// `update_object` cache the record they return, `delete_object` erases the
/// entry. Content reads and listings pass straight through. The cache lock
/// is never held while the wrapped bucket is being called.
pub struct CachingBucket {
    state: InvariantMutex<CacheState>,
    clock: Arc<dyn Clock>,
    wrapped: Arc<dyn Bucket>,
    ttl: Duration,
}

impl CachingBucket {
    // == Constructor ==
    /// Wraps `wrapped`, caching records in `cache` for `ttl` as measured by
    /// `clock`.
    ///
    /// A zero TTL caches nothing. A TTL too large to represent never expires.
    pub fn new(
        ttl: Duration,
        cache: Box<dyn StatCache>,
        clock: Arc<dyn Clock>,
        wrapped: Arc<dyn Bucket>,
    ) -> Self {
        Self {
            state: InvariantMutex::new(
                CacheState {
                    cache,
                    mutations: 0,
                },
                check_state,
            ),
            clock,
            wrapped,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Snapshot of the stat cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.state.lock().cache.stats()
    }

    /// Drops every expired entry, returning how many were removed.
    ///
    /// Works in batches of [`PURGE_BATCH`], releasing the lock between
    /// them so stats are not held up behind a large sweep.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut total = 0;
        loop {
            let removed = self.state.lock().cache.purge_expired(now, PURGE_BATCH);
            total += removed;
            if removed < PURGE_BATCH {
                return total;
            }
        }
    }

    // == Helpers ==

    /// Expiration for a record cached at `now`, or `None` when caching is
    /// disabled.
    fn expiration(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.ttl.is_zero() {
            return None;
        }

        let expiration = chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Some(expiration)
    }

    fn mutation_count(&self) -> u64 {
        self.state.lock().mutations
    }

    /// Returns a live cached record, along with the mutation count observed
    /// at the same moment.
    fn look_up(&self, name: &str) -> (Option<Arc<Object>>, u64) {
        let now = self.clock.now();
        let mut state = self.state.lock();
        (state.cache.look_up(name, now), state.mutations)
    }

    /// Caches a freshly fetched record unless a mutation went through this
    /// bucket after `seen` was observed.
    fn insert_fetched(&self, object: Arc<Object>, seen: u64) {
        let Some(expiration) = self.expiration(self.clock.now()) else {
            return;
        };

        let mut state = self.state.lock();
        if state.mutations != seen {
            debug!(name = %object.name, "mutation raced stat; not caching");
            return;
        }
        state.cache.insert(object, expiration);
    }

    /// Records the outcome of a successful create or update started when
    /// the mutation count was `seen`.
    ///
    /// If another mutation landed in the meantime the two may have reached
    /// the wrapped bucket in either order, so the entry is dropped instead.
    fn record_write(&self, object: Arc<Object>, seen: u64) {
        let expiration = self.expiration(self.clock.now());

        let mut state = self.state.lock();
        let raced = state.mutations != seen;
        state.mutations += 1;
        match expiration {
            Some(expiration) if !raced => {
                trace!(name = %object.name, generation = object.generation, "caching written record");
                state.cache.insert(object, expiration);
            }
            _ => {
                if raced {
                    debug!(name = %object.name, "mutation raced write; dropping entry");
                }
                state.cache.erase(&object.name);
            }
        }
    }

    /// Records a successful delete.
    fn invalidate(&self, name: &str) {
        let mut state = self.state.lock();
        state.mutations += 1;
        state.cache.erase(name);
        trace!(name, "stat cache entry invalidated");
    }
}

#[async_trait]
impl Bucket for CachingBucket {
    fn name(&self) -> &str {
        self.wrapped.name()
    }

    async fn new_reader(&self, req: &ReadObjectRequest) -> Result<ObjectReader> {
        self.wrapped.new_reader(req).await
    }

    async fn create_object(&self, req: &CreateObjectRequest) -> Result<Arc<Object>> {
        let seen = self.mutation_count();
        let object = self.wrapped.create_object(req).await?;
        self.record_write(object.clone(), seen);
        Ok(object)
    }

    async fn stat_object(&self, req: &StatObjectRequest) -> Result<Arc<Object>> {
        let (cached, seen) = self.look_up(&req.name);
        if let Some(object) = cached {
            trace!(name = %req.name, "stat cache hit");
            return Ok(object);
        }

        debug!(name = %req.name, "stat cache miss");
        let object = self.wrapped.stat_object(req).await?;
        self.insert_fetched(object.clone(), seen);
        Ok(object)
    }

    async fn list_objects(&self, req: &ListObjectsRequest) -> Result<Listing> {
        self.wrapped.list_objects(req).await
    }

    async fn update_object(&self, req: &UpdateObjectRequest) -> Result<Arc<Object>> {
        let seen = self.mutation_count();
        let object = self.wrapped.update_object(req).await?;
        self.record_write(object.clone(), seen);
        Ok(object)
    }

    async fn delete_object(&self, name: &str) -> Result<()> {
        self.wrapped.delete_object(name).await?;
        self.invalidate(name);
        Ok(())
    }
}

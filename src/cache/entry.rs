//! Stat Entry Module
//!
//! A cached object record paired with the time it stops being usable.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::bucket::Object;

// == Stat Entry ==
/// A single stat cache entry.
#[derive(Debug, Clone)]
pub struct StatEntry {
    /// The cached record
    pub object: Arc<Object>,
    /// First instant at which the entry must be treated as absent
    pub expiration: DateTime<Utc>,
}

impl StatEntry {
    // == Constructor ==
    pub fn new(object: Arc<Object>, expiration: DateTime<Utc>) -> Self {
        Self { object, expiration }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once `now >= expiration`, so
    /// a record cached with TTL `t` at time `T` is no longer served at
    /// exactly `T + t`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiration
    }
}

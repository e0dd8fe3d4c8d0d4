//! Object Record Module
//!
//! Metadata snapshot for a single stored object.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Object ==
/// Immutable metadata for one generation of an object.
///
/// A changed object is a new `Object`; records are shared as `Arc<Object>`
/// and never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    /// Object name within the bucket
    pub name: String,
    /// Content version, assigned monotonically by the bucket on each write
    pub generation: i64,
    /// Metadata version within a generation, starts at 1
    pub metageneration: i64,
    /// Content length in bytes
    pub size: u64,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub cache_control: Option<String>,
    /// User-supplied key/value metadata
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Hex MD5 digest of the contents
    pub md5: String,
    /// Last modification time (content or metadata)
    pub updated: DateTime<Utc>,
}

impl Object {
    // == Is Newer Than ==
    /// Returns true if `self` describes a strictly later state of the object
    /// than `other`: a newer generation, or the same generation with a newer
    /// metageneration.
    pub fn is_newer_than(&self, other: &Object) -> bool {
        (self.generation, self.metageneration) > (other.generation, other.metageneration)
    }
}

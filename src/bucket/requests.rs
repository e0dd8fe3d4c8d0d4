//! Bucket request and listing types.

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;

use super::Object;

/// Read the contents of an object.
#[derive(Debug, Clone, Default)]
pub struct ReadObjectRequest {
    pub name: String,
    /// Specific generation to read; latest when `None`
    pub generation: Option<i64>,
}

/// Create (or overwrite) an object.
#[derive(Debug, Clone, Default)]
pub struct CreateObjectRequest {
    pub name: String,
    pub contents: Bytes,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub cache_control: Option<String>,
    pub metadata: BTreeMap<String, String>,
    /// If set, the current generation must equal this value. `Some(0)` means
    /// the object must not exist yet.
    pub generation_precondition: Option<i64>,
}

/// Fetch metadata for a single object.
#[derive(Debug, Clone, Default)]
pub struct StatObjectRequest {
    pub name: String,
}

impl StatObjectRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// List objects, optionally collapsing names on a delimiter.
#[derive(Debug, Clone, Default)]
pub struct ListObjectsRequest {
    pub prefix: String,
    pub delimiter: Option<String>,
    /// Token returned by a previous page
    pub continuation_token: Option<String>,
    /// Maximum objects plus collapsed runs per page
    pub max_results: Option<usize>,
}

/// One page of a listing.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub objects: Vec<Arc<Object>>,
    /// Distinct `prefix + ... + delimiter` runs hidden by the delimiter
    pub collapsed_runs: Vec<String>,
    /// Set when more results remain
    pub continuation_token: Option<String>,
}

/// Patch an object's metadata without touching its contents.
///
/// `None` fields are left unchanged. In `metadata`, a `None` value removes
/// the key.
#[derive(Debug, Clone, Default)]
pub struct UpdateObjectRequest {
    pub name: String,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub cache_control: Option<String>,
    pub metadata: BTreeMap<String, Option<String>>,
}

//! In-Memory Bucket Module
//!
//! A complete bucket kept in process memory. Serves as the backing store for
//! the server binary and for tests.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    Bucket, CreateObjectRequest, ListObjectsRequest, Listing, Object, ObjectReader,
    ReadObjectRequest, StatObjectRequest, UpdateObjectRequest,
};
use crate::clock::{Clock, SystemClock};
use crate::error::{BucketError, Result};

/// Page size used when a listing does not ask for one
pub const DEFAULT_MAX_RESULTS: usize = 1000;

// == Stored Object ==
#[derive(Debug, Clone)]
struct StoredObject {
    record: Arc<Object>,
    contents: Bytes,
}

#[derive(Debug, Default)]
struct Contents {
    objects: BTreeMap<String, StoredObject>,
    /// Last generation handed out; generations are bucket-wide and increasing
    last_generation: i64,
}

// == In-Memory Bucket ==
/// Bucket whose objects live in a `BTreeMap` behind an async lock.
pub struct InMemoryBucket {
    name: String,
    clock: Arc<dyn Clock>,
    contents: RwLock<Contents>,
}

impl InMemoryBucket {
    // == Constructor ==
    /// Creates an empty bucket stamped by the system clock.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_clock(name, Arc::new(SystemClock))
    }

    /// Creates an empty bucket that stamps `updated` times from `clock`.
    pub fn with_clock(name: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: name.into(),
            clock,
            contents: RwLock::new(Contents::default()),
        }
    }

    /// Number of objects currently stored.
    pub async fn len(&self) -> usize {
        self.contents.read().await.objects.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BucketError::InvalidRequest(
            "object name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn not_found(name: &str) -> BucketError {
    BucketError::NotFound(name.to_string())
}

#[async_trait]
impl Bucket for InMemoryBucket {
    fn name(&self) -> &str {
        &self.name
    }

    async fn new_reader(&self, req: &ReadObjectRequest) -> Result<ObjectReader> {
        let contents = self.contents.read().await;
        let stored = contents.objects.get(&req.name).ok_or_else(|| not_found(&req.name))?;

        if let Some(generation) = req.generation {
            if generation != stored.record.generation {
                return Err(BucketError::NotFound(format!(
                    "{} (generation {})",
                    req.name, generation
                )));
            }
        }

        Ok(Box::new(Cursor::new(stored.contents.clone())))
    }

    async fn create_object(&self, req: &CreateObjectRequest) -> Result<Arc<Object>> {
        validate_name(&req.name)?;

        let mut contents = self.contents.write().await;

        if let Some(expected) = req.generation_precondition {
            let current = contents
                .objects
                .get(&req.name)
                .map(|s| s.record.generation)
                .unwrap_or(0);
            if current != expected {
                return Err(BucketError::PreconditionFailed(format!(
                    "{}: expected generation {}, found {}",
                    req.name, expected, current
                )));
            }
        }

        contents.last_generation += 1;
        let record = Arc::new(Object {
            name: req.name.clone(),
            generation: contents.last_generation,
            metageneration: 1,
            size: req.contents.len() as u64,
            content_type: req.content_type.clone(),
            content_encoding: req.content_encoding.clone(),
            cache_control: req.cache_control.clone(),
            metadata: req.metadata.clone(),
            md5: format!("{:x}", md5::compute(&req.contents)),
            updated: self.clock.now(),
        });

        contents.objects.insert(
            req.name.clone(),
            StoredObject {
                record: record.clone(),
                contents: req.contents.clone(),
            },
        );

        debug!(name = %req.name, generation = record.generation, "object created");
        Ok(record)
    }

    async fn stat_object(&self, req: &StatObjectRequest) -> Result<Arc<Object>> {
        let contents = self.contents.read().await;
        contents
            .objects
            .get(&req.name)
            .map(|s| s.record.clone())
            .ok_or_else(|| not_found(&req.name))
    }

    async fn list_objects(&self, req: &ListObjectsRequest) -> Result<Listing> {
        let max_results = req.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        if max_results == 0 {
            return Err(BucketError::InvalidRequest(
                "max_results must be positive".to_string(),
            ));
        }

        let delimiter = req.delimiter.as_deref().filter(|d| !d.is_empty());
        let token = req.continuation_token.as_deref();
        if let Some(t) = token {
            if !t.starts_with(&req.prefix) {
                return Err(BucketError::InvalidRequest(format!(
                    "continuation token {t:?} is outside prefix {:?}",
                    req.prefix
                )));
            }
        }
        // A token ending in the delimiter names a collapsed run; everything
        // under it was already returned.
        let token_is_run = matches!((token, delimiter), (Some(t), Some(d)) if t.ends_with(d));

        let contents = self.contents.read().await;
        let mut listing = Listing::default();
        let mut emitted = 0usize;
        let mut last: Option<String> = None;

        for (name, stored) in contents.objects.range(req.prefix.clone()..) {
            if !name.starts_with(&req.prefix) {
                break;
            }
            if let Some(t) = token {
                if name.as_str() <= t || (token_is_run && name.starts_with(t)) {
                    continue;
                }
            }

            let rest = &name[req.prefix.len()..];
            let run = delimiter.and_then(|d| {
                rest.find(d)
                    .map(|idx| format!("{}{}", req.prefix, &rest[..idx + d.len()]))
            });

            if let Some(run) = &run {
                if listing.collapsed_runs.last() == Some(run) {
                    continue;
                }
            }

            if emitted == max_results {
                listing.continuation_token = last;
                break;
            }

            match run {
                Some(run) => {
                    last = Some(run.clone());
                    listing.collapsed_runs.push(run);
                }
                None => {
                    last = Some(name.clone());
                    listing.objects.push(stored.record.clone());
                }
            }
            emitted += 1;
        }

        Ok(listing)
    }

    async fn update_object(&self, req: &UpdateObjectRequest) -> Result<Arc<Object>> {
        let mut contents = self.contents.write().await;
        let stored = contents
            .objects
            .get_mut(&req.name)
            .ok_or_else(|| not_found(&req.name))?;

        let mut record = Object::clone(&stored.record);
        if let Some(v) = &req.content_type {
            record.content_type = Some(v.clone());
        }
        if let Some(v) = &req.content_encoding {
            record.content_encoding = Some(v.clone());
        }
        if let Some(v) = &req.cache_control {
            record.cache_control = Some(v.clone());
        }
        for (key, value) in &req.metadata {
            match value {
                Some(value) => {
                    record.metadata.insert(key.clone(), value.clone());
                }
                None => {
                    record.metadata.remove(key);
                }
            }
        }
        record.metageneration += 1;
        record.updated = self.clock.now();

        let record = Arc::new(record);
        stored.record = record.clone();

        debug!(
            name = %req.name,
            metageneration = record.metageneration,
            "object metadata updated"
        );
        Ok(record)
    }

    async fn delete_object(&self, name: &str) -> Result<()> {
        let mut contents = self.contents.write().await;
        contents
            .objects
            .remove(name)
            .map(|_| debug!(name, "object deleted"))
            .ok_or_else(|| not_found(name))
    }
}

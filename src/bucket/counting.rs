//! Call-counting bucket wrapper
//!
//! Passes every call through to a wrapped bucket, recording how many times
//! each operation reached it. A failure can be armed for the next call of a
//! given operation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{
    Bucket, CreateObjectRequest, ListObjectsRequest, Listing, Object, ObjectReader,
    ReadObjectRequest, StatObjectRequest, UpdateObjectRequest,
};
use crate::error::{BucketError, Result};

/// Bucket operations that reach the wrapped store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketOp {
    NewReader,
    CreateObject,
    StatObject,
    ListObjects,
    UpdateObject,
    DeleteObject,
}

#[derive(Default)]
struct Record {
    calls: HashMap<BucketOp, usize>,
    armed: HashMap<BucketOp, BucketError>,
}

pub struct CountingBucket {
    wrapped: Arc<dyn Bucket>,
    record: Mutex<Record>,
}

impl CountingBucket {
    pub fn new(wrapped: Arc<dyn Bucket>) -> Self {
        Self {
            wrapped,
            record: Mutex::new(Record::default()),
        }
    }

    /// Number of calls of `op` seen so far, including failed ones.
    pub fn calls(&self, op: BucketOp) -> usize {
        let record = self.record.lock().unwrap_or_else(|e| e.into_inner());
        record.calls.get(&op).copied().unwrap_or(0)
    }

    /// Makes the next `op` call fail with `err` without reaching the
    /// wrapped bucket.
    pub fn fail_next(&self, op: BucketOp, err: BucketError) {
        let mut record = self.record.lock().unwrap_or_else(|e| e.into_inner());
        record.armed.insert(op, err);
    }

    fn enter(&self, op: BucketOp) -> Result<()> {
        let mut record = self.record.lock().unwrap_or_else(|e| e.into_inner());
        *record.calls.entry(op).or_insert(0) += 1;
        match record.armed.remove(&op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Bucket for CountingBucket {
    fn name(&self) -> &str {
        self.wrapped.name()
    }

    async fn new_reader(&self, req: &ReadObjectRequest) -> Result<ObjectReader> {
        self.enter(BucketOp::NewReader)?;
        self.wrapped.new_reader(req).await
    }

    async fn create_object(&self, req: &CreateObjectRequest) -> Result<Arc<Object>> {
        self.enter(BucketOp::CreateObject)?;
        self.wrapped.create_object(req).await
    }

    async fn stat_object(&self, req: &StatObjectRequest) -> Result<Arc<Object>> {
        self.enter(BucketOp::StatObject)?;
        self.wrapped.stat_object(req).await
    }

    async fn list_objects(&self, req: &ListObjectsRequest) -> Result<Listing> {
        self.enter(BucketOp::ListObjects)?;
        self.wrapped.list_objects(req).await
    }

    async fn update_object(&self, req: &UpdateObjectRequest) -> Result<Arc<Object>> {
        self.enter(BucketOp::UpdateObject)?;
        self.wrapped.update_object(req).await
    }

    async fn delete_object(&self, name: &str) -> Result<()> {
        self.enter(BucketOp::DeleteObject)?;
        self.wrapped.delete_object(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::InMemoryBucket;

    #[tokio::test]
    async fn test_counts_calls() {
        let bucket = CountingBucket::new(Arc::new(InMemoryBucket::new("b")));

        let _ = bucket.stat_object(&StatObjectRequest::new("a")).await;
        let _ = bucket.stat_object(&StatObjectRequest::new("a")).await;
        let _ = bucket.delete_object("a").await;

        assert_eq!(bucket.calls(BucketOp::StatObject), 2);
        assert_eq!(bucket.calls(BucketOp::DeleteObject), 1);
        assert_eq!(bucket.calls(BucketOp::CreateObject), 0);
        assert_eq!(bucket.name(), "b");
    }

    #[tokio::test]
    async fn test_armed_failure_fires_once() {
        let inner = Arc::new(InMemoryBucket::new("b"));
        let bucket = CountingBucket::new(inner.clone());
        let req = CreateObjectRequest {
            name: "a".into(),
            ..Default::default()
        };

        bucket.fail_next(BucketOp::CreateObject, BucketError::Transport("reset".into()));
        let err = bucket.create_object(&req).await.unwrap_err();
        assert_eq!(err, BucketError::Transport("reset".into()));
        assert!(inner.is_empty().await);

        assert!(bucket.create_object(&req).await.is_ok());
        assert_eq!(bucket.calls(BucketOp::CreateObject), 2);
    }
}

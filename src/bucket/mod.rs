//! Bucket Module
//!
//! The object-storage contract shared by every bucket implementation, the
//! in-process store behind the server, and a call-counting wrapper for tests.

mod counting;
mod memory;
mod object;
mod requests;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::error::Result;

// Re-export public types
pub use counting::{BucketOp, CountingBucket};
pub use memory::InMemoryBucket;
pub use object::Object;
pub use requests::{
    CreateObjectRequest, ListObjectsRequest, Listing, ReadObjectRequest, StatObjectRequest,
    UpdateObjectRequest,
};

/// Streamed object contents.
pub type ObjectReader = Box<dyn AsyncRead + Send + Unpin>;

// == Bucket Trait ==
/// A named container of objects.
///
/// Cancellation is by drop: dropping a returned future abandons the call.
#[async_trait]
pub trait Bucket: Send + Sync {
    /// Name of the bucket.
    fn name(&self) -> &str;

    /// Opens the contents of an object. Fails with `NotFound` if the object
    /// (or the requested generation) does not exist.
    async fn new_reader(&self, req: &ReadObjectRequest) -> Result<ObjectReader>;

    /// Creates or overwrites an object, returning its new record. Fails with
    /// `PreconditionFailed` when a generation precondition does not hold.
    async fn create_object(&self, req: &CreateObjectRequest) -> Result<Arc<Object>>;

    /// Returns the current record for an object, or `NotFound`.
    async fn stat_object(&self, req: &StatObjectRequest) -> Result<Arc<Object>>;

    /// Returns one page of objects matching the request.
    async fn list_objects(&self, req: &ListObjectsRequest) -> Result<Listing>;

    /// Patches metadata and returns the updated record, or `NotFound`.
    async fn update_object(&self, req: &UpdateObjectRequest) -> Result<Arc<Object>>;

    /// Deletes an object. Fails with `NotFound` if it does not exist.
    async fn delete_object(&self, name: &str) -> Result<()>;
}

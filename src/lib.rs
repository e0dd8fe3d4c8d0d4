//! Stat Cache - object metadata caching in front of a bucket
//!
//! Wraps any [`bucket::Bucket`] so that repeated stat calls are answered
//! from memory. Records expire after a TTL and are refreshed or dropped
//! immediately when a mutation goes through the same wrapper.

pub mod api;
pub mod bucket;
pub mod cache;
pub mod caching;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod sync;
pub mod tasks;

pub use api::AppState;
pub use caching::CachingBucket;
pub use config::Config;
pub use error::{BucketError, Result};
pub use tasks::spawn_sweep_task;

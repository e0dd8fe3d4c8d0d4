//! Request and Response models for the bucket API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ListQuery, ReadQuery, UpdateObjectBody};
pub use responses::{
    BucketResponse, DeleteResponse, HealthResponse, ListResponse, StatsResponse,
};

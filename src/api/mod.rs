//! API Module
//!
//! HTTP handlers and routing for the bucket REST API.
//!
//! # Endpoints
//! - `GET /bucket` - Bucket name
//! - `GET /objects` - List objects
//! - `GET /stat/*name` - Object metadata (served through the stat cache)
//! - `GET|PUT|PATCH|DELETE /objects/*name` - Read, create, update, delete
//! - `GET /stats` - Stat cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

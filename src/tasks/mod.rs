//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweep: drops stat cache entries whose TTL has passed

mod sweep;

pub use sweep::spawn_sweep_task;

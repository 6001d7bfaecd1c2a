//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the driver is up.
//!
//! # Tasks
//! - Expiry sweep: drops expired keys from the in-memory store

mod expiry;

pub use expiry::spawn_expiry_task;

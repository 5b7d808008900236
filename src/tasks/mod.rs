//! Background Tasks Module
//!
//! Contains the background worker that runs alongside an expiring cache.
//!
//! # Tasks
//! - Expiry worker: removes entries as their expiry deadlines elapse

mod expiry_worker;

pub use expiry_worker::ExpiryWorker;

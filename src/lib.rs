//! Expiring Cache - a concurrent in-memory key-value cache
//!
//! Entries share one cache-wide TTL. A background worker sleeps until the
//! earliest deadline and removes entries as they expire, so expiry costs
//! nothing while no deadline is due and never scans the key space.

pub mod api;
pub mod cache;
pub mod collections;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, CacheBuilder, ExpiringCache};
pub use config::Config;
pub use error::{CacheError, Result};

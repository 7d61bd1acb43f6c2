//! Background Tasks Module
//!
//! Contains background tasks a host app may run alongside the cache.
//!
//! # Tasks
//! - Expiry purge: removes stale cache entries at a configured interval

mod purge;

pub use purge::{spawn_configured_purge, spawn_purge_task};

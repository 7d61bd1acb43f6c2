//! Portal Cache - local core of the student portal shell
//!
//! Provides a persistent, size-bounded URL cache with time-based expiry,
//! URL routing between the embedded view and the external browser, and
//! bookmark/preference storage on the same key-value backend.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod observer;
pub mod routing;
pub mod settings;
pub mod store;
pub mod tasks;
pub mod telemetry;

pub use cache::{BoundedUrlCache, CacheStats};
pub use config::Config;
pub use error::{CacheError, StoreError};
pub use observer::CacheObserver;
pub use routing::{Navigator, UrlClassifier};
pub use store::KeyValueStore;
pub use tasks::spawn_purge_task;

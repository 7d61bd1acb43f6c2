//! Diagnostics Observer
//!
//! Every failure the cache absorbs is reported here before the caller gets
//! its fallback value.

use std::sync::Mutex;

use crate::error::CacheError;

// == Observer Trait ==
/// Receives failures and notable events from cache and navigation operations.
pub trait CacheObserver: Send + Sync {
    /// Called once per absorbed failure with the operation that hit it.
    fn on_failure(&self, operation: &'static str, error: &CacheError);

    /// Called with the keys removed by a capacity eviction.
    fn on_eviction(&self, _keys: &[String]) {}
}

// == No-op Observer ==
/// Default observer, ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CacheObserver for NoopObserver {
    fn on_failure(&self, _operation: &'static str, _error: &CacheError) {}
}

// == Recording Observer ==
/// A recorded failure: operation name, error kind, rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFailure {
    pub operation: &'static str,
    pub kind: &'static str,
    pub message: String,
}

/// Observer that keeps everything it sees, for tests and debug screens.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    failures: Mutex<Vec<RecordedFailure>>,
    evictions: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded failures in arrival order.
    pub fn failures(&self) -> Vec<RecordedFailure> {
        match self.failures.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Snapshot of every evicted key in arrival order.
    pub fn evicted_keys(&self) -> Vec<String> {
        match self.evictions.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl CacheObserver for RecordingObserver {
    fn on_failure(&self, operation: &'static str, error: &CacheError) {
        let record = RecordedFailure {
            operation,
            kind: error.kind(),
            message: error.to_string(),
        };
        match self.failures.lock() {
            Ok(mut guard) => guard.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }

    fn on_eviction(&self, keys: &[String]) {
        match self.evictions.lock() {
            Ok(mut guard) => guard.extend_from_slice(keys),
            Err(poisoned) => poisoned.into_inner().extend_from_slice(keys),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn test_recording_observer_collects_failures() {
        let observer = RecordingObserver::new();
        let err = CacheError::read("@cache_x", StoreError::Unavailable("offline".into()));

        observer.on_failure("get", &err);

        let failures = observer.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].operation, "get");
        assert_eq!(failures[0].kind, "storage_read");
        assert!(failures[0].message.contains("offline"));
    }

    #[test]
    fn test_recording_observer_collects_evictions() {
        let observer = RecordingObserver::new();
        observer.on_eviction(&["a".to_string(), "b".to_string()]);
        observer.on_eviction(&["c".to_string()]);

        assert_eq!(observer.evicted_keys(), vec!["a", "b", "c"]);
    }
}

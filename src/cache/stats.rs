//! Cache Statistics Module
//!
//! Size report of the persisted cache plus in-process operation counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Size and count of entries physically present in the store.
///
/// Expired entries that have not been read yet are still counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Sum of entry sizes in bytes
    pub total_size_bytes: u64,
    /// Number of stored entries
    pub entry_count: usize,
    /// Configured byte budget
    pub capacity_bytes: u64,
}

impl CacheStats {
    /// Empty report for a cache with the given budget.
    pub fn empty(capacity_bytes: u64) -> Self {
        Self {
            capacity_bytes,
            ..Self::default()
        }
    }

    // == Usage ==
    /// Fraction of the budget in use. Can exceed 1.0 after an oversized insert.
    pub fn usage_ratio(&self) -> f64 {
        if self.capacity_bytes == 0 {
            0.0
        } else {
            self.total_size_bytes as f64 / self.capacity_bytes as f64
        }
    }

    /// Bytes left before the next insert triggers eviction.
    pub fn remaining_bytes(&self) -> u64 {
        self.capacity_bytes.saturating_sub(self.total_size_bytes)
    }
}

// == Cache Metrics ==
/// Operation counters since the cache was constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheMetrics {
    /// Reads that returned a payload
    pub hits: u64,
    /// Reads that returned nothing (missing, expired or failed)
    pub misses: u64,
    /// Entries removed to make room
    pub evictions: u64,
    /// Entries removed because they were stale
    pub expirations: u64,
    /// Storage or parse failures absorbed
    pub failures: u64,
}

impl CacheMetrics {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Metrics Recorder ==
/// Lock-free counters behind `CacheMetrics`.
#[derive(Debug, Default)]
pub(crate) struct MetricsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
    failures: AtomicU64,
}

impl MetricsRecorder {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evictions(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_expiration(&self) {
        self.expirations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheMetrics {
        CacheMetrics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_empty() {
        let stats = CacheStats::empty(100);
        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.total_size_bytes, 0);
        assert_eq!(stats.capacity_bytes, 100);
        assert_eq!(stats.remaining_bytes(), 100);
    }

    #[test]
    fn test_usage_ratio() {
        let stats = CacheStats {
            total_size_bytes: 25,
            entry_count: 1,
            capacity_bytes: 100,
        };
        assert_eq!(stats.usage_ratio(), 0.25);
        assert_eq!(CacheStats::empty(0).usage_ratio(), 0.0);
    }

    #[test]
    fn test_remaining_bytes_saturates_when_over_budget() {
        let stats = CacheStats {
            total_size_bytes: 150,
            entry_count: 1,
            capacity_bytes: 100,
        };
        assert_eq!(stats.remaining_bytes(), 0);
        assert!(stats.usage_ratio() > 1.0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheMetrics::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let recorder = MetricsRecorder::default();
        recorder.record_hit();
        recorder.record_miss();

        assert_eq!(recorder.snapshot().hit_rate(), 0.5);
    }

    #[test]
    fn test_recorder_snapshot() {
        let recorder = MetricsRecorder::default();
        recorder.record_evictions(3);
        recorder.record_expiration();
        recorder.record_failure();
        recorder.record_failure();

        let metrics = recorder.snapshot();
        assert_eq!(metrics.evictions, 3);
        assert_eq!(metrics.expirations, 1);
        assert_eq!(metrics.failures, 2);
        assert_eq!(metrics.hits, 0);
    }
}

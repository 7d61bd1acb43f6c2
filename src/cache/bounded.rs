//! Bounded URL Cache
//!
//! Persistent URL -> payload cache with a byte budget, insertion-age eviction
//! and lazy time-based expiry. Every operation is best-effort: failures are
//! logged, counted and handed to the observer, and the caller gets a benign
//! fallback instead of an error.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::cache::eviction::select_victims;
use crate::cache::stats::MetricsRecorder;
use crate::cache::{
    CacheEntry, CacheMetrics, CacheStats, EntryMeta, CACHE_INDEX_KEY, CACHE_PREFIX,
};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::observer::{CacheObserver, NoopObserver};
use crate::store::KeyValueStore;

/// Storage key of the record for `url`.
pub fn entry_key(url: &str) -> String {
    format!("{}{}", CACHE_PREFIX, url)
}

/// True if `url` would be stored on top of the index record.
fn is_reserved(url: &str) -> bool {
    entry_key(url) == CACHE_INDEX_KEY
}

// == Bounded URL Cache ==
/// Size-bounded, time-expiring cache keyed by URL.
///
/// Entries live in the injected store under `@cache_<url>`; the ordered key
/// index lives under `@cache_index`.
pub struct BoundedUrlCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn CacheObserver>,
    metrics: MetricsRecorder,
    capacity_bytes: u64,
    expiry_ms: u64,
    enabled: bool,
}

impl BoundedUrlCache {
    // == Constructor ==
    /// Creates a cache over `store` with the given byte budget and expiry window.
    ///
    /// # Arguments
    /// * `store` - Persistent backend, may be shared with other components
    /// * `capacity_bytes` - Total byte budget across all entries
    /// * `expiry_ms` - Age in milliseconds after which an entry is stale
    pub fn new(store: Arc<dyn KeyValueStore>, capacity_bytes: u64, expiry_ms: u64) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            observer: Arc::new(NoopObserver),
            metrics: MetricsRecorder::default(),
            capacity_bytes,
            expiry_ms,
            enabled: true,
        }
    }

    /// Creates a cache from configuration.
    pub fn from_config(store: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        Self::new(store, config.capacity_bytes, config.expiry_ms).with_enabled(config.cache_enabled)
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Installs a diagnostics observer.
    pub fn with_observer(mut self, observer: Arc<dyn CacheObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// When disabled, `put` does nothing and `get` always misses.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn capacity_bytes(&self) -> u64 {
        self.capacity_bytes
    }

    pub fn expiry_ms(&self) -> u64 {
        self.expiry_ms
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // == Put ==
    /// Stores `payload` under `key`, evicting the oldest entries if needed.
    ///
    /// Overwriting a key replaces the payload and resets its insertion time.
    /// An entry larger than the whole budget is still admitted.
    pub async fn put(&self, key: &str, payload: &str) {
        if !self.enabled {
            return;
        }
        if let Err(e) = self.try_put(key, payload).await {
            self.report("put", e);
        }
    }

    async fn try_put(&self, key: &str, payload: &str) -> Result<()> {
        if is_reserved(key) {
            return Err(CacheError::ReservedKey {
                key: key.to_string(),
            });
        }
        let size_bytes = payload.len() as u64;

        let mut index = self.load_index().await?;
        let metas = self.load_metas(&index).await;
        let total: u64 = metas.iter().map(|m| m.size_bytes).sum();

        if total + size_bytes > self.capacity_bytes {
            debug!(
                "Cache over budget: total={} incoming={} capacity={}",
                total, size_bytes, self.capacity_bytes
            );
            let victims = select_victims(&metas, size_bytes);
            self.evict(&mut index, &victims).await;
        }

        let entry = CacheEntry::new(key, payload, self.clock.now_ms());
        let record = serde_json::to_string(&entry).map_err(|e| CacheError::parse(key, e))?;
        let storage_key = entry_key(key);
        self.store
            .set(&storage_key, &record)
            .await
            .map_err(|e| CacheError::write(storage_key, e))?;

        if !index.iter().any(|k| k == key) {
            index.push(key.to_string());
            self.save_index(&index).await?;
        }

        debug!("Cached {} ({} bytes)", key, size_bytes);
        Ok(())
    }

    // == Get ==
    /// Returns the payload for `key` if present and fresh.
    ///
    /// A stale entry is removed on the spot. Reads never change ordering or
    /// timestamps.
    pub async fn get(&self, key: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }
        match self.try_get(key).await {
            Ok(Some(payload)) => {
                self.metrics.record_hit();
                Some(payload)
            }
            Ok(None) => {
                self.metrics.record_miss();
                None
            }
            Err(e) => {
                self.metrics.record_miss();
                self.report("get", e);
                None
            }
        }
    }

    async fn try_get(&self, key: &str) -> Result<Option<String>> {
        if is_reserved(key) {
            return Ok(None);
        }
        let Some(entry) = self.load_entry(key).await? else {
            return Ok(None);
        };

        if entry.is_expired(self.clock.now_ms(), self.expiry_ms) {
            debug!("Entry expired: {}", key);
            self.metrics.record_expiration();
            self.try_remove(key).await?;
            return Ok(None);
        }

        Ok(Some(entry.payload))
    }

    // == Contains ==
    /// True if `get` would return a payload. Applies the same lazy expiry
    /// but leaves the hit and miss counters alone.
    pub async fn contains(&self, key: &str) -> bool {
        if !self.enabled {
            return false;
        }
        match self.try_get(key).await {
            Ok(payload) => payload.is_some(),
            Err(e) => {
                self.report("contains", e);
                false
            }
        }
    }

    // == Remove ==
    /// Deletes `key` and its index membership. Absent keys are a no-op.
    pub async fn remove(&self, key: &str) {
        if let Err(e) = self.try_remove(key).await {
            self.report("remove", e);
        }
    }

    async fn try_remove(&self, key: &str) -> Result<()> {
        if is_reserved(key) {
            return Ok(());
        }
        let storage_key = entry_key(key);
        self.store
            .remove(&storage_key)
            .await
            .map_err(|e| CacheError::write(storage_key, e))?;

        let index = self.load_index().await?;
        if index.iter().any(|k| k == key) {
            let index: Vec<String> = index.into_iter().filter(|k| k != key).collect();
            self.save_index(&index).await?;
        }
        Ok(())
    }

    // == Clear ==
    /// Deletes every cache entry and the index.
    ///
    /// Stray `@cache_` records not listed in the index (left behind by an
    /// interrupted `put`) are swept too. Other keys in the store are untouched.
    pub async fn clear(&self) {
        let index = match self.load_index().await {
            Ok(index) => index,
            Err(e) => {
                self.report("clear", e);
                Vec::new()
            }
        };

        for key in &index {
            let storage_key = entry_key(key);
            if let Err(e) = self.store.remove(&storage_key).await {
                self.report("clear", CacheError::write(storage_key, e));
            }
        }

        match self.store.keys().await {
            Ok(keys) => {
                for stray in keys.iter().filter(|k| k.starts_with(CACHE_PREFIX)) {
                    if let Err(e) = self.store.remove(stray).await {
                        self.report("clear", CacheError::write(stray.as_str(), e));
                    }
                }
            }
            Err(e) => {
                self.report("clear", CacheError::read("<keys>", e));
                if let Err(e) = self.store.remove(CACHE_INDEX_KEY).await {
                    self.report("clear", CacheError::write(CACHE_INDEX_KEY, e));
                }
            }
        }

        info!("Cache cleared ({} indexed entries)", index.len());
    }

    // == Stats ==
    /// Size and count of stored entries.
    ///
    /// Does not expire anything; stale-but-unread entries are still counted.
    pub async fn stats(&self) -> CacheStats {
        let index = match self.load_index().await {
            Ok(index) => index,
            Err(e) => {
                self.report("stats", e);
                return CacheStats::empty(self.capacity_bytes);
            }
        };

        let metas = self.load_metas(&index).await;
        CacheStats {
            total_size_bytes: metas.iter().map(|m| m.size_bytes).sum(),
            entry_count: metas.len(),
            capacity_bytes: self.capacity_bytes,
        }
    }

    // == Keys ==
    /// Indexed keys in insertion order.
    pub async fn keys(&self) -> Vec<String> {
        match self.load_index().await {
            Ok(index) => index,
            Err(e) => {
                self.report("keys", e);
                Vec::new()
            }
        }
    }

    // == Purge Expired ==
    /// Removes every stale entry. Returns the number removed.
    pub async fn purge_expired(&self) -> usize {
        let index = match self.load_index().await {
            Ok(index) => index,
            Err(e) => {
                self.report("purge_expired", e);
                return 0;
            }
        };

        let now = self.clock.now_ms();
        let expired: Vec<String> = self
            .load_metas(&index)
            .await
            .into_iter()
            .filter(|m| now.saturating_sub(m.created_at) > self.expiry_ms)
            .map(|m| m.key)
            .collect();

        let mut removed = 0;
        for key in &expired {
            match self.try_remove(key).await {
                Ok(()) => {
                    self.metrics.record_expiration();
                    removed += 1;
                }
                Err(e) => self.report("purge_expired", e),
            }
        }

        removed
    }

    // == Metrics ==
    /// Operation counters since construction.
    pub fn metrics(&self) -> CacheMetrics {
        self.metrics.snapshot()
    }

    // == Eviction ==
    /// Removes `victims` from the store and from `index`.
    ///
    /// Keys whose record could not be deleted stay indexed so the index never
    /// loses track of a stored record.
    async fn evict(&self, index: &mut Vec<String>, victims: &[String]) {
        if victims.is_empty() {
            return;
        }

        let mut removed = Vec::with_capacity(victims.len());
        for key in victims {
            let storage_key = entry_key(key);
            match self.store.remove(&storage_key).await {
                Ok(()) => removed.push(key.clone()),
                Err(e) => self.report("evict", CacheError::write(storage_key, e)),
            }
        }

        index.retain(|k| !removed.contains(k));
        if let Err(e) = self.save_index(index).await {
            self.report("evict", e);
        }

        info!("Evicted {} cache entries", removed.len());
        self.metrics.record_evictions(removed.len() as u64);
        self.observer.on_eviction(&removed);
    }

    // == Storage Helpers ==
    async fn load_index(&self) -> Result<Vec<String>> {
        let raw = self
            .store
            .get(CACHE_INDEX_KEY)
            .await
            .map_err(|e| CacheError::read(CACHE_INDEX_KEY, e))?;

        match raw {
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| CacheError::parse(CACHE_INDEX_KEY, e))
            }
            None => Ok(Vec::new()),
        }
    }

    async fn save_index(&self, index: &[String]) -> Result<()> {
        let json =
            serde_json::to_string(index).map_err(|e| CacheError::parse(CACHE_INDEX_KEY, e))?;
        self.store
            .set(CACHE_INDEX_KEY, &json)
            .await
            .map_err(|e| CacheError::write(CACHE_INDEX_KEY, e))
    }

    async fn load_entry(&self, key: &str) -> Result<Option<CacheEntry>> {
        let storage_key = entry_key(key);
        let raw = self
            .store
            .get(&storage_key)
            .await
            .map_err(|e| CacheError::read(storage_key.as_str(), e))?;

        match raw {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| CacheError::parse(storage_key, e)),
            None => Ok(None),
        }
    }

    /// Metadata of every indexed entry that can be read, in index order.
    ///
    /// Unreadable records are reported and left out of the result.
    async fn load_metas(&self, index: &[String]) -> Vec<EntryMeta> {
        let mut metas = Vec::with_capacity(index.len());
        for key in index {
            match self.load_entry(key).await {
                Ok(Some(entry)) => metas.push(EntryMeta {
                    key: key.clone(),
                    size_bytes: entry.size_bytes,
                    created_at: entry.created_at,
                }),
                Ok(None) => {}
                Err(e) => self.report("load_entry", e),
            }
        }
        metas
    }

    fn report(&self, operation: &'static str, err: CacheError) {
        error!(operation, kind = err.kind(), "Cache operation failed: {}", err);
        self.metrics.record_failure();
        self.observer.on_failure(operation, &err);
    }
}

impl std::fmt::Debug for BoundedUrlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedUrlCache")
            .field("capacity_bytes", &self.capacity_bytes)
            .field("expiry_ms", &self.expiry_ms)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

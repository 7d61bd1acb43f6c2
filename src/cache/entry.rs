//! Cache Entry Module
//!
//! Defines the persisted record for a single cached URL.

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A cached payload and the metadata needed for expiry and capacity accounting.
///
/// Serialized field names (`url`, `data`, `timestamp`, `size`) are the on-disk
/// record format shared with records written by earlier app versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The URL this entry represents
    #[serde(rename = "url")]
    pub key: String,
    /// Opaque cached content
    #[serde(rename = "data")]
    pub payload: String,
    /// Insertion timestamp (Unix milliseconds), never touched by reads
    #[serde(rename = "timestamp")]
    pub created_at: u64,
    /// Byte length of `payload` at insertion time
    #[serde(rename = "size")]
    pub size_bytes: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped at `now_ms`.
    ///
    /// # Arguments
    /// * `key` - The URL being cached
    /// * `payload` - The content to store
    /// * `now_ms` - Insertion time in Unix milliseconds
    pub fn new(key: impl Into<String>, payload: impl Into<String>, now_ms: u64) -> Self {
        let payload = payload.into();
        let size_bytes = payload.len() as u64;

        Self {
            key: key.into(),
            payload,
            created_at: now_ms,
            size_bytes,
        }
    }

    // == Age ==
    /// Milliseconds elapsed since insertion. Zero if the clock went backwards.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at)
    }

    // == Is Expired ==
    /// Checks if the entry is stale.
    ///
    /// Boundary condition: an entry exactly `expiry_ms` old is still fresh; it
    /// expires once its age strictly exceeds the window.
    pub fn is_expired(&self, now_ms: u64, expiry_ms: u64) -> bool {
        self.age_ms(now_ms) > expiry_ms
    }

    // == Time To Live ==
    /// Returns milliseconds left before the entry becomes stale, 0 once expired.
    pub fn ttl_remaining_ms(&self, now_ms: u64, expiry_ms: u64) -> u64 {
        expiry_ms.saturating_sub(self.age_ms(now_ms))
    }

    // == Metadata ==
    /// Capacity accounting view of this entry.
    pub fn meta(&self) -> EntryMeta {
        EntryMeta {
            key: self.key.clone(),
            size_bytes: self.size_bytes,
            created_at: self.created_at,
        }
    }
}

// == Entry Metadata ==
/// Key, size and insertion time of an entry, without the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMeta {
    pub key: String,
    pub size_bytes: u64,
    pub created_at: u64,
}

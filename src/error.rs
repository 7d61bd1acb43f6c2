//! Error types for the portal cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Store Error ==
/// Failure reported by a persistent key-value store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file could not be (de)serialized
    #[error("Corrupt store data: {0}")]
    Corrupt(String),

    /// Backend refused or is unavailable
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// == Cache Error Enum ==
/// Unified error type for cache, routing and settings operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Reading a key from the store failed
    #[error("Storage read failed for {key}: {source}")]
    StorageRead {
        key: String,
        #[source]
        source: StoreError,
    },

    /// Writing or removing a key in the store failed
    #[error("Storage write failed for {key}: {source}")]
    StorageWrite {
        key: String,
        #[source]
        source: StoreError,
    },

    /// A stored record was not valid JSON for its type
    #[error("Malformed record under {key}: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A URL could not be parsed
    #[error("Invalid URL {url}: {source}")]
    UrlParse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The external opener failed to open a URL
    #[error("External open failed for {url}: {reason}")]
    ExternalOpen { url: String, reason: String },

    /// The key maps onto a storage key the cache reserves for itself
    #[error("Key {key} collides with a reserved storage key")]
    ReservedKey { key: String },
}

impl CacheError {
    // == Constructors ==
    pub fn read(key: impl Into<String>, source: StoreError) -> Self {
        CacheError::StorageRead {
            key: key.into(),
            source,
        }
    }

    pub fn write(key: impl Into<String>, source: StoreError) -> Self {
        CacheError::StorageWrite {
            key: key.into(),
            source,
        }
    }

    pub fn parse(key: impl Into<String>, source: serde_json::Error) -> Self {
        CacheError::Parse {
            key: key.into(),
            source,
        }
    }

    // == Kind ==
    /// Short stable name of the failure category, used in logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheError::StorageRead { .. } => "storage_read",
            CacheError::StorageWrite { .. } => "storage_write",
            CacheError::Parse { .. } => "parse",
            CacheError::UrlParse { .. } => "url_parse",
            CacheError::ExternalOpen { .. } => "external_open",
            CacheError::ReservedKey { .. } => "reserved_key",
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the portal cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = CacheError::read("k", StoreError::Unavailable("down".into()));
        assert_eq!(err.kind(), "storage_read");

        let err = CacheError::write("k", StoreError::Unavailable("down".into()));
        assert_eq!(err.kind(), "storage_write");

        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        assert_eq!(CacheError::parse("k", source).kind(), "parse");

        let err = CacheError::ReservedKey { key: "index".into() };
        assert_eq!(err.kind(), "reserved_key");
    }

    #[test]
    fn test_error_display_includes_key() {
        let err = CacheError::write("@cache_index", StoreError::Unavailable("full".into()));
        let msg = err.to_string();
        assert!(msg.contains("@cache_index"));
        assert!(msg.contains("full"));
    }
}

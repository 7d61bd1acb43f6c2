//! Configuration Module
//!
//! Handles loading cache and routing configuration from environment variables.

use std::env;

use crate::cache::DEFAULT_EXPIRY_MS;
use crate::routing::DomainMatch;

// == Defaults ==
const DEFAULT_CACHE_SIZE_MB: u64 = 50;
const DEFAULT_ALLOWED_DOMAINS: &[&str] = &["ensabm.usms.ac.ma", "usms.ac.ma"];
const DEFAULT_EXTERNAL_DOMAINS: &[&str] =
    &["google.com", "facebook.com", "twitter.com", "youtube.com"];

/// Portal shell configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Total byte budget across all cache entries
    pub capacity_bytes: u64,
    /// Age in milliseconds after which a cache entry is stale
    pub expiry_ms: u64,
    /// Master switch for the page cache
    pub cache_enabled: bool,
    /// Hostnames that stay inside the embedded view
    pub allowed_domains: Vec<String>,
    /// Hostnames that always go to the external browser
    pub external_domains: Vec<String>,
    /// How hostnames are compared against the domain lists
    pub domain_match: DomainMatch,
    /// Background purge interval in seconds, 0 disables the task
    pub purge_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORTAL_CACHE_SIZE_MB` - Cache budget in megabytes (default: 50)
    /// - `PORTAL_CACHE_EXPIRY_MS` - Entry expiry in milliseconds (default: 24h)
    /// - `PORTAL_CACHE_ENABLED` - `true`/`false` (default: true)
    /// - `PORTAL_ALLOWED_DOMAINS` - Comma separated list
    /// - `PORTAL_EXTERNAL_DOMAINS` - Comma separated list
    /// - `PORTAL_DOMAIN_MATCH` - `substring` or `suffix` (default: substring)
    /// - `PORTAL_PURGE_INTERVAL` - Purge frequency in seconds (default: 0)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            capacity_bytes: env::var("PORTAL_CACHE_SIZE_MB")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(megabytes)
                .unwrap_or(defaults.capacity_bytes),
            expiry_ms: env::var("PORTAL_CACHE_EXPIRY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.expiry_ms),
            cache_enabled: env::var("PORTAL_CACHE_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_enabled),
            allowed_domains: env::var("PORTAL_ALLOWED_DOMAINS")
                .ok()
                .map(|v| split_list(&v))
                .unwrap_or(defaults.allowed_domains),
            external_domains: env::var("PORTAL_EXTERNAL_DOMAINS")
                .ok()
                .map(|v| split_list(&v))
                .unwrap_or(defaults.external_domains),
            domain_match: env::var("PORTAL_DOMAIN_MATCH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.domain_match),
            purge_interval: env::var("PORTAL_PURGE_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.purge_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity_bytes: megabytes(DEFAULT_CACHE_SIZE_MB),
            expiry_ms: DEFAULT_EXPIRY_MS,
            cache_enabled: true,
            allowed_domains: DEFAULT_ALLOWED_DOMAINS.iter().map(|d| d.to_string()).collect(),
            external_domains: DEFAULT_EXTERNAL_DOMAINS.iter().map(|d| d.to_string()).collect(),
            domain_match: DomainMatch::Substring,
            purge_interval: 0,
        }
    }
}

/// Converts a megabyte count to bytes, saturating at `u64::MAX`.
pub fn megabytes(mb: u64) -> u64 {
    mb.saturating_mul(1024 * 1024)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

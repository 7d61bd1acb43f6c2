//! Preferences
//!
//! Theme and language choices persisted as JSON strings.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{CacheError, Result};
use crate::settings::{LANGUAGE_KEY, THEME_KEY, USER_PREFERENCES_KEY};
use crate::store::KeyValueStore;

/// Language used until the user picks one.
pub const DEFAULT_LANGUAGE: &str = "fr";

/// Languages the portal is available in.
pub const SUPPORTED_LANGUAGES: &[&str] = &["fr", "ar"];

// == Theme Mode ==
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme mode: {}", other)),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Light => f.write_str("light"),
            ThemeMode::Dark => f.write_str("dark"),
        }
    }
}

pub fn is_supported_language(language: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&language)
}

// == Preferences ==
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Saved theme, `Light` when unset or unreadable.
    pub async fn theme(&self) -> ThemeMode {
        self.read(THEME_KEY).await.unwrap_or_default()
    }

    pub async fn set_theme(&self, mode: ThemeMode) -> Result<()> {
        self.write(THEME_KEY, &mode).await
    }

    /// Saved language, `fr` when unset or unreadable.
    pub async fn language(&self) -> String {
        self.read(LANGUAGE_KEY)
            .await
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    /// Saves `language`. Unsupported codes are stored as-is; the UI decides
    /// what it offers via `is_supported_language`.
    pub async fn set_language(&self, language: &str) -> Result<()> {
        self.write(LANGUAGE_KEY, &language).await
    }

    /// Free-form preferences object saved by the host app, `None` when unset
    /// or unreadable.
    pub async fn user_preferences(&self) -> Option<Value> {
        self.read(USER_PREFERENCES_KEY).await
    }

    pub async fn set_user_preferences(&self, preferences: &Value) -> Result<()> {
        self.write(USER_PREFERENCES_KEY, preferences).await
    }

    async fn read<T: serde::de::DeserializeOwned>(&self, key: &'static str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("{}", CacheError::read(key, e));
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("{}", CacheError::parse(key, e));
                None
            }
        }
    }

    async fn write<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).map_err(|e| CacheError::parse(key, e))?;
        self.store
            .set(key, &json)
            .await
            .map_err(|e| CacheError::write(key, e))
    }
}

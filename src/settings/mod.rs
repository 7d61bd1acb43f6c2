//! Settings Module
//!
//! User-facing data persisted next to the cache: bookmarks and preferences.

mod bookmarks;
mod preferences;

pub use bookmarks::Bookmarks;
pub use preferences::{
    is_supported_language, Preferences, ThemeMode, DEFAULT_LANGUAGE, SUPPORTED_LANGUAGES,
};

// == Storage Keys ==
pub const BOOKMARKS_KEY: &str = "@bookmarks";
pub const THEME_KEY: &str = "@theme_mode";
pub const LANGUAGE_KEY: &str = "@language";
pub const USER_PREFERENCES_KEY: &str = "@user_preferences";

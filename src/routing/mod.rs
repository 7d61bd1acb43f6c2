//! Routing Module
//!
//! URL classification for the embedded portal view and external hand-off.

mod classifier;
mod links;
mod navigator;

pub use classifier::{DomainMatch, Route, UrlClassifier};
pub use links::{
    custom_user_agent, extract_domain, file_extension, is_downloadable_file, is_https,
    is_valid_url, Platform, DOWNLOADABLE_EXTENSIONS, USER_AGENT_SUFFIX,
};
pub use navigator::{ExternalOpener, NavigationDecision, Navigator};

//! Link helpers used around navigation: domain extraction, scheme checks,
//! download detection and the shell's user agent.

use url::Url;

/// Appended to the platform user agent so the portal can recognise the app.
pub const USER_AGENT_SUFFIX: &str = "EspaceEtudiantApp/1.0";

/// Extensions handed to the download manager instead of the embedded view.
pub const DOWNLOADABLE_EXTENSIONS: &[&str] =
    &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "zip", "rar"];

/// Hostname of `url`, or an empty string if it cannot be parsed.
pub fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

pub fn is_https(url: &str) -> bool {
    Url::parse(url).is_ok_and(|u| u.scheme() == "https")
}

pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}

/// Lowercase extension of the last path segment, empty if there is none.
///
/// Dotfiles such as `/.htaccess` have no extension.
pub fn file_extension(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };

    let segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    match segment.rfind('.') {
        Some(dot) if dot > 0 => segment[dot + 1..].to_ascii_lowercase(),
        _ => String::new(),
    }
}

/// True if `url` points at a document or archive the shell should download.
pub fn is_downloadable_file(url: &str) -> bool {
    let extension = file_extension(url);
    DOWNLOADABLE_EXTENSIONS.contains(&extension.as_str())
}

// == User Agent ==
/// Host platform of the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
    Other,
}

impl Platform {
    fn base_user_agent(self) -> &'static str {
        match self {
            Platform::Android => "Mozilla/5.0 (Linux; Android 10) AppleWebKit/537.36",
            Platform::Ios => "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X)",
            Platform::Other => "Mozilla/5.0",
        }
    }
}

/// User agent sent by the embedded view.
pub fn custom_user_agent(platform: Platform) -> String {
    format!("{} {}", platform.base_user_agent(), USER_AGENT_SUFFIX)
}

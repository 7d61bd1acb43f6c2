//! URL Classifier
//!
//! Decides whether a URL stays in the embedded portal view or belongs to the
//! external browser, based on allowed and external domain lists.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::config::Config;
use crate::error::{CacheError, Result};

// == Domain Match Policy ==
/// How a hostname is compared against a configured domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DomainMatch {
    /// Hostname contains the domain anywhere. Compatible with records and
    /// links produced by earlier app versions, but `usms.ac.ma.evil.com`
    /// matches `usms.ac.ma`.
    #[default]
    Substring,
    /// Hostname equals the domain or ends with `.` + domain.
    Suffix,
}

impl DomainMatch {
    /// Returns true if `host` matches `domain` under this policy.
    ///
    /// Both sides are expected in lowercase.
    pub fn matches(self, host: &str, domain: &str) -> bool {
        match self {
            DomainMatch::Substring => host.contains(domain),
            DomainMatch::Suffix => {
                host == domain
                    || host
                        .strip_suffix(domain)
                        .is_some_and(|rest| rest.ends_with('.'))
            }
        }
    }
}

impl FromStr for DomainMatch {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(DomainMatch::Substring),
            "suffix" => Ok(DomainMatch::Suffix),
            other => Err(format!("unknown domain match policy: {}", other)),
        }
    }
}

impl fmt::Display for DomainMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainMatch::Substring => f.write_str("substring"),
            DomainMatch::Suffix => f.write_str("suffix"),
        }
    }
}

// == Route ==
/// Where a navigation should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Stay in the embedded view
    Internal,
    /// Hand off to the OS browser
    External,
}

// == URL Classifier ==
#[derive(Debug, Clone)]
pub struct UrlClassifier {
    allowed: Vec<String>,
    external: Vec<String>,
    mode: DomainMatch,
}

impl UrlClassifier {
    // == Constructor ==
    /// Creates a classifier using substring matching.
    ///
    /// # Arguments
    /// * `allowed` - Domains that may be shown in the embedded view
    /// * `external` - Domains that always go to the external browser
    pub fn new<A, E>(allowed: A, external: E) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            allowed: normalize(allowed),
            external: normalize(external),
            mode: DomainMatch::Substring,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.allowed_domains, &config.external_domains)
            .with_match(config.domain_match)
    }

    pub fn with_match(mut self, mode: DomainMatch) -> Self {
        self.mode = mode;
        self
    }

    pub fn match_policy(&self) -> DomainMatch {
        self.mode
    }

    // == Classify ==
    /// Classifies `url`, failing closed: unparsable URLs are external.
    pub fn classify(&self, url: &str) -> Route {
        self.try_classify(url).unwrap_or(Route::External)
    }

    /// Classifies `url`, surfacing parse failures.
    pub fn try_classify(&self, url: &str) -> Result<Route> {
        let parsed = Url::parse(url).map_err(|source| CacheError::UrlParse {
            url: url.to_string(),
            source,
        })?;

        Ok(match parsed.host_str() {
            Some(host) => self.classify_host(host),
            None => Route::External,
        })
    }

    /// Classifies a bare hostname.
    pub fn classify_host(&self, host: &str) -> Route {
        let host = host.to_ascii_lowercase();
        let is_allowed = self.allowed.iter().any(|d| self.mode.matches(&host, d));
        let is_external = self.external.iter().any(|d| self.mode.matches(&host, d));

        if is_allowed && !is_external {
            Route::Internal
        } else {
            Route::External
        }
    }

    /// True if `url` should be shown in the embedded view.
    pub fn is_internal(&self, url: &str) -> bool {
        self.classify(url) == Route::Internal
    }
}

fn normalize<I>(domains: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    domains
        .into_iter()
        .map(|d| d.as_ref().trim().to_ascii_lowercase())
        .filter(|d| !d.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portal() -> UrlClassifier {
        UrlClassifier::new(["ensabm.usms.ac.ma", "usms.ac.ma"], ["google.com"])
    }

    #[test]
    fn test_portal_host_is_internal() {
        let classifier = portal();
        assert_eq!(
            classifier.classify("https://ensabm.usms.ac.ma/espace_etudiant/index.php"),
            Route::Internal
        );
        assert!(classifier.is_internal("https://usms.ac.ma/"));
    }

    #[test]
    fn test_external_host() {
        let classifier = portal();
        assert_eq!(classifier.classify("https://www.google.com/search?q=x"), Route::External);
    }

    #[test]
    fn test_unlisted_host_is_external() {
        assert!(!portal().is_internal("https://example.org/"));
    }

    #[test]
    fn test_malformed_url_fails_closed() {
        let classifier = portal();
        assert_eq!(classifier.classify("not a url"), Route::External);
        assert!(matches!(
            classifier.try_classify("not a url"),
            Err(CacheError::UrlParse { .. })
        ));
    }

    #[test]
    fn test_url_without_host_is_external() {
        assert!(!portal().is_internal("mailto:scolarite@usms.ac.ma"));
    }

    #[test]
    fn test_external_wins_over_allowed() {
        let classifier = UrlClassifier::new(["usms.ac.ma"], ["google.com"]);
        assert!(!classifier.is_internal("https://usms.ac.ma.google.com/"));
    }

    #[test]
    fn test_substring_accepts_lookalike_host() {
        let classifier = portal();
        assert!(classifier.is_internal("https://notensabm.usms.ac.ma.evil.com/"));
    }

    #[test]
    fn test_suffix_rejects_lookalike_host() {
        let classifier = portal().with_match(DomainMatch::Suffix);

        assert!(!classifier.is_internal("https://notensabm.usms.ac.ma.evil.com/"));
        assert!(!classifier.is_internal("https://evilusms.ac.ma/"));
        assert!(classifier.is_internal("https://ensabm.usms.ac.ma/"));
        assert!(classifier.is_internal("https://moodle.usms.ac.ma/"));
    }

    #[test]
    fn test_host_case_is_ignored() {
        let classifier = UrlClassifier::new(["ENSABM.usms.ac.ma"], Vec::<String>::new());
        assert_eq!(classifier.classify_host("Ensabm.USMS.ac.ma"), Route::Internal);
    }

    #[test]
    fn test_domain_match_parse() {
        assert_eq!("suffix".parse::<DomainMatch>(), Ok(DomainMatch::Suffix));
        assert_eq!(" Substring ".parse::<DomainMatch>(), Ok(DomainMatch::Substring));
        assert!("exact".parse::<DomainMatch>().is_err());
        assert_eq!(DomainMatch::Suffix.to_string(), "suffix");
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            domain_match: DomainMatch::Suffix,
            ..Config::default()
        };
        let classifier = UrlClassifier::from_config(&config);

        assert_eq!(classifier.match_policy(), DomainMatch::Suffix);
        assert!(classifier.is_internal("https://ensabm.usms.ac.ma/"));
        assert!(!classifier.is_internal("https://youtube.com/watch"));
    }
}

//! Navigator
//!
//! Applies the classifier to navigation requests and hands non-internal URLs
//! to the platform's external opener.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::{CacheError, Result};
use crate::observer::{CacheObserver, NoopObserver};
use crate::routing::{Route, UrlClassifier};

// == External Opener Trait ==
/// OS facility that opens URLs outside the app.
#[async_trait]
pub trait ExternalOpener: Send + Sync {
    /// Whether some installed app can handle `url`.
    async fn can_open(&self, url: &str) -> Result<bool>;

    /// Opens `url` outside the embedded view.
    async fn open(&self, url: &str) -> Result<()>;
}

// == Navigation Decision ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// The embedded view may load the URL
    StayInView,
    /// The URL was handed to the external opener
    OpenedExternally,
    /// Not internal and the opener could not take it
    Blocked,
}

impl NavigationDecision {
    /// Whether the embedded view should proceed with the load.
    pub fn allows_in_view(self) -> bool {
        self == NavigationDecision::StayInView
    }
}

// == Navigator ==
pub struct Navigator {
    classifier: UrlClassifier,
    opener: Arc<dyn ExternalOpener>,
    observer: Arc<dyn CacheObserver>,
}

impl Navigator {
    pub fn new(classifier: UrlClassifier, opener: Arc<dyn ExternalOpener>) -> Self {
        Self {
            classifier,
            opener,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn CacheObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn classifier(&self) -> &UrlClassifier {
        &self.classifier
    }

    // == Handle ==
    /// Decides where `url` is shown, opening it externally when needed.
    ///
    /// Never fails: parse and opener errors go to the observer and the URL
    /// is kept out of the embedded view.
    pub async fn handle(&self, url: &str) -> NavigationDecision {
        let route = match self.classifier.try_classify(url) {
            Ok(route) => route,
            Err(e) => {
                self.report("classify", e);
                Route::External
            }
        };

        if route == Route::Internal {
            debug!("Navigating in view: {}", url);
            return NavigationDecision::StayInView;
        }

        match self.open_external(url).await {
            Ok(true) => {
                info!("Opened externally: {}", url);
                NavigationDecision::OpenedExternally
            }
            Ok(false) => {
                warn!("No handler can open URL: {}", url);
                NavigationDecision::Blocked
            }
            Err(e) => {
                self.report("open_external", e);
                NavigationDecision::Blocked
            }
        }
    }

    async fn open_external(&self, url: &str) -> Result<bool> {
        if !self.opener.can_open(url).await? {
            return Ok(false);
        }
        self.opener.open(url).await?;
        Ok(true)
    }

    fn report(&self, operation: &'static str, err: CacheError) {
        warn!(operation, kind = err.kind(), "Navigation failure: {}", err);
        self.observer.on_failure(operation, &err);
    }
}

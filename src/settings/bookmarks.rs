//! Bookmarks
//!
//! Ordered list of saved portal URLs, stored as one JSON array.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{CacheError, Result};
use crate::settings::BOOKMARKS_KEY;
use crate::store::KeyValueStore;

pub struct Bookmarks {
    store: Arc<dyn KeyValueStore>,
}

impl Bookmarks {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    // == List ==
    /// Saved URLs in the order they were added.
    ///
    /// Missing or unreadable data yields an empty list.
    pub async fn list(&self) -> Vec<String> {
        match self.load().await {
            Ok(bookmarks) => bookmarks,
            Err(e) => {
                warn!("Could not read bookmarks: {}", e);
                Vec::new()
            }
        }
    }

    // == Add ==
    /// Appends `url` unless it is already saved.
    pub async fn add(&self, url: &str) -> Result<()> {
        let mut bookmarks = self.load().await?;
        if bookmarks.iter().any(|b| b == url) {
            return Ok(());
        }
        bookmarks.push(url.to_string());
        self.save(&bookmarks).await?;
        debug!("Bookmarked {}", url);
        Ok(())
    }

    // == Remove ==
    pub async fn remove(&self, url: &str) -> Result<()> {
        let mut bookmarks = self.load().await?;
        bookmarks.retain(|b| b != url);
        self.save(&bookmarks).await
    }

    // == Contains ==
    pub async fn contains(&self, url: &str) -> bool {
        self.list().await.iter().any(|b| b == url)
    }

    /// Adds `url` if absent, removes it otherwise. Returns the new state.
    pub async fn toggle(&self, url: &str) -> Result<bool> {
        if self.load().await?.iter().any(|b| b == url) {
            self.remove(url).await?;
            Ok(false)
        } else {
            self.add(url).await?;
            Ok(true)
        }
    }

    async fn load(&self) -> Result<Vec<String>> {
        let raw = self
            .store
            .get(BOOKMARKS_KEY)
            .await
            .map_err(|e| CacheError::read(BOOKMARKS_KEY, e))?;

        match raw {
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| CacheError::parse(BOOKMARKS_KEY, e))
            }
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, bookmarks: &[String]) -> Result<()> {
        let json =
            serde_json::to_string(bookmarks).map_err(|e| CacheError::parse(BOOKMARKS_KEY, e))?;
        self.store
            .set(BOOKMARKS_KEY, &json)
            .await
            .map_err(|e| CacheError::write(BOOKMARKS_KEY, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn bookmarks() -> (Bookmarks, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Bookmarks::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_add_does_not_duplicate() {
        let (bookmarks, _) = bookmarks();

        bookmarks.add("https://ensabm.usms.ac.ma/notes.php").await.unwrap();
        bookmarks.add("https://ensabm.usms.ac.ma/emploi.php").await.unwrap();
        bookmarks.add("https://ensabm.usms.ac.ma/notes.php").await.unwrap();

        assert_eq!(
            bookmarks.list().await,
            vec![
                "https://ensabm.usms.ac.ma/notes.php",
                "https://ensabm.usms.ac.ma/emploi.php"
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_and_contains() {
        let (bookmarks, _) = bookmarks();

        bookmarks.add("a").await.unwrap();
        assert!(bookmarks.contains("a").await);

        bookmarks.remove("a").await.unwrap();
        bookmarks.remove("never").await.unwrap();
        assert!(!bookmarks.contains("a").await);
        assert!(bookmarks.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_toggle() {
        let (bookmarks, _) = bookmarks();

        assert!(bookmarks.toggle("a").await.unwrap());
        assert!(!bookmarks.toggle("a").await.unwrap());
        assert!(bookmarks.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_list_reads_empty_but_refuses_writes() {
        let (bookmarks, store) = bookmarks();
        store.set(BOOKMARKS_KEY, "{").await.unwrap();

        assert!(bookmarks.list().await.is_empty());
        assert!(matches!(bookmarks.add("a").await, Err(CacheError::Parse { .. })));
    }
}

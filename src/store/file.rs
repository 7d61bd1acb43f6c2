//! JSON-file store backend.
//!
//! Keeps the whole map in memory and rewrites the file on every mutation
//! through a temp file + rename, so a crash leaves either the old or the new
//! snapshot on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{KeyValueStore, StoreResult};
use crate::error::StoreError;

// == File Store ==
/// Durable store backed by a single JSON object file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    // == Constructor ==
    /// Opens the store at `path`, loading existing contents if the file exists.
    ///
    /// Parent directories are created as needed.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), keys = data.len(), "Opened file store");

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // == Persist ==
    async fn persist(&self, data: &BTreeMap<String, String>) -> StoreResult<()> {
        let bytes = serde_json::to_vec(data).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "Persisted file store");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let previous = data.insert(key.to_string(), value.to_string());

        if let Err(e) = self.persist(&data).await {
            // Keep memory in step with what is on disk
            match previous {
                Some(old) => data.insert(key.to_string(), old),
                None => data.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let Some(previous) = data.remove(key) else {
            return Ok(());
        };

        if let Err(e) = self.persist(&data).await {
            data.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }

    async fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.data.read().await.keys().cloned().collect())
    }

    async fn remove_all(&self) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let snapshot = std::mem::take(&mut *data);

        if let Err(e) = self.persist(&data).await {
            *data = snapshot;
            return Err(e);
        }
        Ok(())
    }
}

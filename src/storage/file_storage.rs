use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{StorageError, TokenStorage};

/// The config needed for the file-backed token slot.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct FileStorageConfig {
    pub path: String,
}

/// Persists the token as `{ "<key>": "<token>" }` in a small JSON file,
/// the desktop equivalent of a browser's local storage entry.
pub struct FileTokenStorage {
    path: PathBuf,
    key: String,
}

impl FileTokenStorage {
    pub fn new(config: &FileStorageConfig, key: &str) -> Self {
        FileTokenStorage {
            path: PathBuf::from(&config.path),
            key: key.to_string(),
        }
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let body = serde_json::to_vec_pretty(entries)?;
        tokio::fs::write(&self.path, body).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStorage for FileTokenStorage {
    async fn get(&self) -> Result<Option<String>, StorageError> {
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(&self.key))
    }

    async fn set(&self, token: &str) -> Result<(), StorageError> {
        let mut entries = self.read_entries().await?;
        entries.insert(self.key.clone(), token.to_string());
        debug!("Writing token to '{}'", self.path.display());
        self.write_entries(&entries).await
    }

    async fn remove(&self) -> Result<(), StorageError> {
        let mut entries = self.read_entries().await?;
        if entries.remove(&self.key).is_none() {
            return Ok(());
        }
        debug!("Removing token from '{}'", self.path.display());
        self.write_entries(&entries).await
    }
}

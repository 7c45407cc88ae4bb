use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use super::{file_storage::FileTokenStorage, memory_storage::MemoryTokenStorage};
use crate::config::{StorageBackend, StorageConfig};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("token storage i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("token storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// The TokenStorage trait abstracts the single persisted credential slot
/// (get, set, remove). No expiry or validation happens here.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    async fn get(&self) -> Result<Option<String>, StorageError>;
    async fn set(&self, token: &str) -> Result<(), StorageError>;
    async fn remove(&self) -> Result<(), StorageError>;
    fn is_persistent(&self) -> bool {
        // Real backends survive a restart; the memory slot returns false
        // so we can write better debug messages.
        true
    }
}

/// Creates a concrete storage implementation based on the StorageConfig.
/// If `storage.enabled = false` (or no backend is given), the token only lives in memory.
pub fn create_token_storage(config: &StorageConfig) -> Arc<dyn TokenStorage> {
    if !config.enabled {
        info!("Token storage is disabled. Using in-memory slot.");
        return Arc::new(MemoryTokenStorage::new());
    }

    match &config.backend {
        Some(StorageBackend::File(file_config)) => {
            info!("Persisting token to file '{}'.", file_config.path);
            Arc::new(FileTokenStorage::new(file_config, &config.key))
        }
        None => {
            warn!("Token storage is enabled, but no backend config is provided! Using in-memory slot.");
            Arc::new(MemoryTokenStorage::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file_storage::FileStorageConfig;

    #[test]
    fn test_disabled_storage_is_not_persistent() {
        let storage = create_token_storage(&StorageConfig::default());
        assert!(!storage.is_persistent());
    }

    #[test]
    fn test_enabled_without_backend_falls_back_to_memory() {
        let config = StorageConfig {
            enabled: true,
            ..Default::default()
        };
        assert!(!create_token_storage(&config).is_persistent());
    }

    #[test]
    fn test_file_backend() {
        let config = StorageConfig {
            enabled: true,
            key: "k".to_string(),
            backend: Some(StorageBackend::File(FileStorageConfig {
                path: "/tmp/aq3stat-test/session.json".to_string(),
            })),
        };
        assert!(create_token_storage(&config).is_persistent());
    }
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::storage::file_storage::FileStorageConfig;

/// Storage key under which the session token is persisted.
pub const DEFAULT_TOKEN_KEY: &str = "aq3stat-token";

/// A wrapper for the token storage configuration:
/// - enabled: if false, the token only lives in memory (MemoryTokenStorage).
/// - backend: the actual persistent backend (file, etc.).
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct StorageConfig {
    pub enabled: bool,
    #[serde(default = "default_token_key")]
    pub key: String,
    #[serde(flatten)]
    pub backend: Option<StorageBackend>,
}

fn default_token_key() -> String {
    DEFAULT_TOKEN_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            enabled: false,
            key: default_token_key(),
            backend: None,
        }
    }
}

/// The existing storage backends. We differentiate them via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
#[serde(tag = "type")]
pub enum StorageBackend {
    #[serde(rename = "file")]
    File(FileStorageConfig),
}

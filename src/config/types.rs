use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LoggingConfig;
use super::storage::StorageConfig;

/// Environment variable holding an alternative config file path.
pub const CONFIG_PATH_ENV: &str = "AQ3STAT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error loading configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("invalid logging.level '{0}'. Valid values: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
    #[error("error initialising logging: {0}")]
    LoggingInit(String),
    #[error("error rendering configuration schema: {0}")]
    Schema(#[from] serde_json::Error),
}

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: backend location, token storage, notices and logging.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the backend lives and how long a single call may take.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
}

fn default_timeout_in_ms() -> u64 {
    10_000
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiConfig {
            base_url: base_url.into(),
            timeout_in_ms: default_timeout_in_ms(),
        }
    }
}

/// Transient notice settings.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct NotificationConfig {
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// Window in which repeated 401s only produce one notice and one redirect.
    /// Zero disables de-duplication.
    #[serde(default = "default_debounce_ms")]
    pub session_expired_debounce_ms: u64,
}

fn default_duration_ms() -> u64 {
    5_000
}

fn default_debounce_ms() -> u64 {
    1_000
}

impl Default for NotificationConfig {
    fn default() -> Self {
        NotificationConfig {
            duration_ms: default_duration_ms(),
            session_expired_debounce_ms: default_debounce_ms(),
        }
    }
}

/// Builds the figment used by `load_config`: the YAML file first, then
/// `AQ3STAT_`-prefixed environment variables (`__` separates nested keys).
pub fn figment() -> Figment {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    Figment::new()
        .merge(Yaml::file(path))
        .merge(Env::prefixed("AQ3STAT_").ignore(&["CONFIG"]).split("__"))
}

/// Load config from the YAML file and environment.
pub fn load_config() -> Result<ConfigV1, ConfigError> {
    extract(figment())
}

/// Extract a versioned config from any figment.
pub fn extract(figment: Figment) -> Result<ConfigV1, ConfigError> {
    let config = figment.extract::<Config>().map_err(Box::new)?;
    match config {
        Config::ConfigV1(c) => Ok(c),
    }
}

/// Render the JSON schema for the configuration.
pub fn print_schema() -> Result<String, ConfigError> {
    let schema = schema_for!(Config);
    Ok(serde_json::to_string_pretty(&schema)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageBackend;

    const MINIMAL: &str = r#"
version: "1.0.0"
api:
  base_url: "http://localhost:8080/api"
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = extract(Figment::new().merge(Yaml::string(MINIMAL))).unwrap();
        assert_eq!(config.api.timeout_in_ms, 10_000);
        assert!(!config.storage.enabled);
        assert_eq!(config.storage.key, "aq3stat-token");
        assert_eq!(config.notifications.duration_ms, 5_000);
        assert_eq!(config.notifications.session_expired_debounce_ms, 1_000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_file_storage_backend() {
        let yaml = r#"
version: "1.0.0"
api:
  base_url: "http://localhost:8080/api"
  timeout_in_ms: 2500
storage:
  enabled: true
  type: file
  path: /tmp/aq3stat/session.json
"#;
        let config = extract(Figment::new().merge(Yaml::string(yaml))).unwrap();
        assert_eq!(config.api.timeout_in_ms, 2500);
        match config.storage.backend {
            Some(StorageBackend::File(file)) => {
                assert_eq!(file.path, "/tmp/aq3stat/session.json")
            }
            None => panic!("expected a file backend"),
        }
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let yaml = r#"
version: "0.9.0"
api:
  base_url: "http://localhost"
"#;
        assert!(extract(Figment::new().merge(Yaml::string(yaml))).is_err());
    }

    #[test]
    fn test_schema_renders() {
        let schema = print_schema().unwrap();
        assert!(schema.contains("base_url"));
        assert!(schema.contains("Minimum level"));
    }
}

#![allow(dead_code)]

use std::sync::Arc;

use aq3stat_client::config::{extract, ConfigV1};
use aq3stat_client::shell::ShellEvent;
use aq3stat_client::state::App;
use aq3stat_client::storage::memory_storage::MemoryTokenStorage;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use tokio::sync::broadcast::Receiver;

pub fn test_config(base_url: &str) -> ConfigV1 {
    let yaml = format!(
        r#"
version: "1.0.0"
api:
  base_url: "{}"
  timeout_in_ms: 2000
storage:
  enabled: false
notifications:
  duration_ms: 3000
  session_expired_debounce_ms: 0
logging:
  level: "debug"
  format: "json"
"#,
        base_url
    );
    extract(Figment::new().merge(Yaml::string(&yaml))).expect("Failed to parse test config YAML")
}

/// Builds the application against `base_url`, optionally with a token left
/// over from a previous run.
pub async fn build_app(base_url: &str, token: Option<&str>) -> (App, Arc<MemoryTokenStorage>) {
    let storage = Arc::new(match token {
        Some(t) => MemoryTokenStorage::with_token(t),
        None => MemoryTokenStorage::new(),
    });
    let app = App::with_storage(test_config(base_url), storage.clone())
        .await
        .expect("app should build");
    (app, storage)
}

pub fn drain(rx: &mut Receiver<ShellEvent>) -> Vec<ShellEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn navigations(events: &[ShellEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            ShellEvent::Navigate(path) => Some(path.clone()),
            _ => None,
        })
        .collect()
}

pub fn notices(events: &[ShellEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            ShellEvent::Notice(n) => Some(n.message.clone()),
            _ => None,
        })
        .collect()
}

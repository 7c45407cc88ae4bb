use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tracing::debug;

use crate::api::WebsiteApi;
use crate::request::ApiError;

/// Cached view of the signed-in user's websites.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebsiteState {
    pub websites: Vec<Value>,
    pub current_website: Option<Value>,
    pub website_stats: Option<Value>,
}

/// Holds the last fetched website list, the website being viewed and its
/// statistics. Failed fetches leave the state untouched.
#[derive(Default)]
pub struct WebsiteStore {
    state: RwLock<WebsiteState>,
}

fn website_id(website: &Value) -> Option<i64> {
    website.get("id").and_then(Value::as_i64)
}

/// The list endpoint answers with a bare array or with `{"websites": [...]}`.
fn into_list(response: &Value) -> Vec<Value> {
    match response {
        Value::Array(items) => items.clone(),
        Value::Object(map) => match map.get("websites") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

impl WebsiteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, WebsiteState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, WebsiteState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> WebsiteState {
        self.read().clone()
    }

    pub fn websites(&self) -> Vec<Value> {
        self.read().websites.clone()
    }

    pub fn current_website(&self) -> Option<Value> {
        self.read().current_website.clone()
    }

    pub fn website_stats(&self) -> Option<Value> {
        self.read().website_stats.clone()
    }

    pub async fn get_websites(&self, api: &WebsiteApi) -> Result<Value, ApiError> {
        let response = api.get_websites().await?;
        let websites = into_list(&response);
        debug!("Loaded {} websites", websites.len());
        self.write().websites = websites;
        Ok(response)
    }

    pub async fn get_website(&self, api: &WebsiteApi, id: i64) -> Result<Value, ApiError> {
        let website = api.get_website(id).await?;
        self.write().current_website = Some(website.clone());
        Ok(website)
    }

    pub async fn get_website_stats(&self, api: &WebsiteApi, id: i64) -> Result<Value, ApiError> {
        let stats = api.get_website_stats(id).await?;
        self.write().website_stats = Some(stats.clone());
        Ok(stats)
    }

    pub fn add_website(&self, website: Value) {
        self.write().websites.push(website);
    }

    /// Replaces the listed entry with the same id and refreshes the current
    /// website if it is the one being updated. Unknown ids are not appended.
    pub fn update_website(&self, website: Value) {
        let Some(id) = website_id(&website) else {
            debug!("Ignoring website update without an id");
            return;
        };
        let mut state = self.write();
        if let Some(slot) = state
            .websites
            .iter_mut()
            .find(|w| website_id(w) == Some(id))
        {
            *slot = website.clone();
        }
        if state.current_website.as_ref().and_then(website_id) == Some(id) {
            state.current_website = Some(website);
        }
    }

    /// Drops the website from the list and clears it as current website.
    pub fn remove_website(&self, id: i64) {
        let mut state = self.write();
        state.websites.retain(|w| website_id(w) != Some(id));
        if state.current_website.as_ref().and_then(website_id) == Some(id) {
            state.current_website = None;
        }
    }
}

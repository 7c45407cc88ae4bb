use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::page_query;
use crate::request::{ApiClient, ApiError};

/// Icon style used when none is requested for the tracking snippet.
pub const DEFAULT_TRACKING_ICON: &str = "1";

/// Body for creating or updating a website.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct WebsiteRequest {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_public: bool,
}

/// `/websites/*` endpoints.
pub struct WebsiteApi {
    client: Arc<ApiClient>,
}

impl WebsiteApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        WebsiteApi { client }
    }

    pub async fn get_websites(&self) -> Result<Value, ApiError> {
        self.client.get("/websites", &[]).await
    }

    pub async fn get_website(&self, id: i64) -> Result<Value, ApiError> {
        self.client.get(&format!("/websites/{}", id), &[]).await
    }

    pub async fn create_website(&self, website: &WebsiteRequest) -> Result<Value, ApiError> {
        self.client.post("/websites", website).await
    }

    pub async fn update_website(&self, id: i64, website: &WebsiteRequest) -> Result<Value, ApiError> {
        self.client.put(&format!("/websites/{}", id), website).await
    }

    pub async fn delete_website(&self, id: i64) -> Result<Value, ApiError> {
        self.client.delete(&format!("/websites/{}", id)).await
    }

    pub async fn get_tracking_code(&self, id: i64, icon: Option<&str>) -> Result<Value, ApiError> {
        let icon = icon.unwrap_or(DEFAULT_TRACKING_ICON).to_string();
        self.client
            .get(&format!("/websites/{}/tracking-code", id), &[("icon", icon)])
            .await
    }

    pub async fn get_website_stats(&self, id: i64) -> Result<Value, ApiError> {
        self.client.get(&format!("/websites/{}/stats", id), &[]).await
    }

    pub async fn get_website_referer_stats(&self, id: i64) -> Result<Value, ApiError> {
        self.client
            .get(&format!("/websites/{}/referer-stats", id), &[])
            .await
    }

    pub async fn get_website_device_stats(&self, id: i64) -> Result<Value, ApiError> {
        self.client
            .get(&format!("/websites/{}/device-stats", id), &[])
            .await
    }

    pub async fn get_public_websites(&self, page: u32, page_size: u32) -> Result<Value, ApiError> {
        self.client
            .get("/websites/public", &page_query(page, page_size))
            .await
    }
}

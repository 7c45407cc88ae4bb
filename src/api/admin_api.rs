use std::sync::Arc;

use serde_json::{json, Value};

use super::page_query;
use crate::models::Group;
use crate::request::{ApiClient, ApiError};

/// `/admin/*` endpoints. The backend refuses them for non-admin users.
pub struct AdminApi {
    client: Arc<ApiClient>,
}

impl AdminApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        AdminApi { client }
    }

    pub async fn get_users(&self, page: u32, page_size: u32) -> Result<Value, ApiError> {
        self.client
            .get("/admin/users", &page_query(page, page_size))
            .await
    }

    pub async fn update_user(&self, id: i64, data: &Value) -> Result<Value, ApiError> {
        self.client.put(&format!("/admin/users/{}", id), data).await
    }

    pub async fn reset_user_password(&self, id: i64, new_password: &str) -> Result<Value, ApiError> {
        let body = json!({ "new_password": new_password });
        self.client
            .post(&format!("/admin/users/{}/reset-password", id), &body)
            .await
    }

    pub async fn delete_user(&self, id: i64) -> Result<Value, ApiError> {
        self.client.delete(&format!("/admin/users/{}", id)).await
    }

    pub async fn get_groups(&self) -> Result<Vec<Group>, ApiError> {
        self.client.get("/admin/groups", &[]).await
    }

    pub async fn get_group(&self, id: i64) -> Result<Group, ApiError> {
        self.client.get(&format!("/admin/groups/{}", id), &[]).await
    }

    pub async fn create_group(&self, data: &Value) -> Result<Group, ApiError> {
        self.client.post("/admin/groups", data).await
    }

    pub async fn update_group(&self, id: i64, data: &Value) -> Result<Value, ApiError> {
        self.client.put(&format!("/admin/groups/{}", id), data).await
    }

    pub async fn delete_group(&self, id: i64) -> Result<Value, ApiError> {
        self.client.delete(&format!("/admin/groups/{}", id)).await
    }

    pub async fn get_system_stats(&self) -> Result<Value, ApiError> {
        self.client.get("/admin/stats", &[]).await
    }
}

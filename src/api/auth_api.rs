use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::{LoginResponse, User};
use crate::request::{ApiClient, ApiError};
use crate::session::AuthService;

/// Body of `POST /auth/register`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// `/auth/*` and the self-service `/users/{id}` endpoints.
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        AuthApi { client }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<Value, ApiError> {
        self.client.post("/auth/register", request).await
    }

    pub async fn update_user(&self, id: i64, data: &Value) -> Result<Value, ApiError> {
        self.client.put(&format!("/users/{}", id), data).await
    }

    pub async fn change_password(
        &self,
        id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<Value, ApiError> {
        let body = json!({"old_password": old_password, "new_password": new_password});
        self.client
            .post(&format!("/users/{}/change-password", id), &body)
            .await
    }
}

#[async_trait]
impl AuthService for AuthApi {
    /// A 401 here means bad credentials rather than an expired session.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest { username, password };
        self.client
            .post("/auth/login", &body)
            .await
            .map_err(|e| match e {
                ApiError::SessionExpired { message } => ApiError::AuthFailure { message },
                other => other,
            })
    }

    async fn get_info(&self) -> Result<Option<User>, ApiError> {
        let value: Value = self.client.get("/auth/me", &[]).await?;
        if is_empty(&value) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, NotificationConfig};
    use crate::session::SessionStore;
    use crate::shell::Shell;
    use crate::storage::memory_storage::MemoryTokenStorage;
    use mockito::{Matcher, Server};

    async fn auth_api(uri: String, token: Option<&str>) -> AuthApi {
        let storage = match token {
            Some(t) => Arc::new(MemoryTokenStorage::with_token(t)),
            None => Arc::new(MemoryTokenStorage::new()),
        };
        let session = Arc::new(SessionStore::rehydrate(storage).await);
        let client = ApiClient::new(
            &ApiConfig::new(uri),
            &NotificationConfig::default(),
            session,
            Shell::default(),
        )
        .unwrap();
        AuthApi::new(Arc::new(client))
    }

    #[test]
    fn test_is_empty() {
        assert!(is_empty(&Value::Null));
        assert!(is_empty(&json!({})));
        assert!(is_empty(&json!("")));
        assert!(is_empty(&json!(false)));
        assert!(!is_empty(&json!({"id": 1})));
    }

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/auth/login")
            .match_body(Matcher::Json(json!({"username": "bob", "password": "x"})))
            .with_status(200)
            .with_body(r#"{"token": "tok", "user": {"id": 1, "username": "bob"}}"#)
            .create_async()
            .await;

        let api = auth_api(server.url(), None).await;
        let response = api.login("bob", "x").await.unwrap();
        m.assert_async().await;
        assert_eq!(response.token, "tok");
        assert_eq!(response.user.username, "bob");
    }

    #[tokio::test]
    async fn test_login_rejection_is_auth_failure() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/auth/login")
            .with_status(401)
            .with_body(r#"{"error": "invalid username or password"}"#)
            .create_async()
            .await;

        let api = auth_api(server.url(), None).await;
        let err = api.login("bob", "bad").await.unwrap_err();
        assert_eq!(
            err,
            ApiError::AuthFailure {
                message: "invalid username or password".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_get_info_empty_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/auth/me")
            .with_status(200)
            .create_async()
            .await;

        let api = auth_api(server.url(), Some("abc")).await;
        assert_eq!(api.get_info().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_info_user() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/auth/me")
            .match_header("authorization", "Bearer abc")
            .with_status(200)
            .with_body(r#"{"id": 1, "username": "root", "group": {"is_admin": true}}"#)
            .create_async()
            .await;

        let api = auth_api(server.url(), Some("abc")).await;
        let user = api.get_info().await.unwrap().unwrap();
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn test_change_password_path() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/users/3/change-password")
            .match_body(Matcher::Json(
                json!({"old_password": "a", "new_password": "b"}),
            ))
            .with_status(200)
            .with_body(r#"{"message": "Password changed successfully"}"#)
            .create_async()
            .await;

        let api = auth_api(server.url(), Some("abc")).await;
        api.change_password(3, "a", "b").await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_register_skips_empty_optional_fields() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/auth/register")
            .match_body(Matcher::Json(
                json!({"username": "amy", "password": "pw", "email": "amy@example.com"}),
            ))
            .with_status(201)
            .with_body(r#"{"message": "User registered successfully"}"#)
            .create_async()
            .await;

        let api = auth_api(server.url(), None).await;
        let request = RegisterRequest {
            username: "amy".into(),
            password: "pw".into(),
            email: "amy@example.com".into(),
            ..Default::default()
        };
        api.register(&request).await.unwrap();
        m.assert_async().await;
    }
}

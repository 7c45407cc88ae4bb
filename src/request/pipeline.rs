use std::sync::Arc;
use std::time::Duration;

use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::{ApiError, NETWORK_ERROR_MESSAGE, SESSION_EXPIRED_MESSAGE};
use crate::config::{ApiConfig, NotificationConfig};
use crate::session::SessionStore;
use crate::shell::Shell;
use crate::utils::mask::mask_token;
use crate::utils::throttle::Throttle;

/// Where the pipeline sends the user once the backend rejects their token.
pub const LOGIN_PATH: &str = "/login";

const SESSION_EXPIRED_KEY: &str = "session.expired";

/// The single HTTP client every backend wrapper goes through.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    shell: Shell,
    expiry_throttle: Throttle,
}

impl ApiClient {
    pub fn new(
        api_config: &ApiConfig,
        notifications: &NotificationConfig,
        session: Arc<SessionStore>,
        shell: Shell,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(api_config.timeout_in_ms))
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        info!(
            "Creating API client for '{}' (timeout {} ms)",
            api_config.base_url, api_config.timeout_in_ms
        );

        Ok(ApiClient {
            client,
            base_url: api_config.base_url.trim_end_matches('/').to_string(),
            session,
            shell,
            expiry_throttle: Throttle::new(Duration::from_millis(
                notifications.session_expired_debounce_ms,
            )),
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends one request and returns the response body.
    ///
    /// An empty body comes back as `Value::Null`, a non-JSON body as a string.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = self.url(path);
        let mut request = self.client.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        // Read the token at call time, not when the client was built.
        if let Some(token) = self.session.token() {
            debug!("{} {} (bearer {})", method, url, mask_token(&token));
            request = request.bearer_auth(token);
        } else {
            debug!("{} {} (anonymous)", method, url);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => return Err(self.network_failure(&method, &url, e)),
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => return Err(self.network_failure(&method, &url, e)),
        };

        if status.is_success() {
            return Ok(unwrap_body(&bytes));
        }

        let err = ApiError::from_response(status, &bytes);
        if status == StatusCode::UNAUTHORIZED {
            self.session_expired(&method, &url).await;
        } else {
            warn!(
                event_name = "request.backend_error",
                event_domain = "request",
                status = status.as_u16(),
                "{} {} failed: {}",
                method,
                url,
                err
            );
            if let ApiError::BackendError { message, .. } = &err {
                self.shell.error(message.clone());
            }
        }
        Err(err)
    }

    /// Resets the session and sends the user back to the login page. Every
    /// 401 resets; the notice and redirect fire once per debounce window.
    async fn session_expired(&self, method: &Method, url: &str) {
        warn!(
            event_name = "request.session_expired",
            event_domain = "request",
            "{} {} rejected with 401; resetting session",
            method,
            url
        );
        self.session.reset_token().await;
        match self.expiry_throttle.should_emit(SESSION_EXPIRED_KEY) {
            Some(suppressed_count) => {
                if suppressed_count > 0 {
                    debug!(suppressed_count, "earlier session-expired redirects were suppressed");
                }
                self.shell.error(SESSION_EXPIRED_MESSAGE);
                self.shell.navigate(LOGIN_PATH);
            }
            None => debug!("Session-expired redirect already issued in this window"),
        }
    }

    fn network_failure(&self, method: &Method, url: &str, e: reqwest::Error) -> ApiError {
        warn!(
            event_name = "request.network_error",
            event_domain = "request",
            timeout = e.is_timeout(),
            "{} {} got no response: {}",
            method,
            url,
            e
        );
        self.shell.error(NETWORK_ERROR_MESSAGE);
        ApiError::NetworkError {
            message: e.to_string(),
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        decode(self.send(Method::GET, path, query, None).await?)
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        decode(self.send(Method::POST, path, &[], Some(&body)).await?)
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        decode(self.send(Method::PUT, path, &[], Some(&body)).await?)
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        decode(self.send(Method::DELETE, path, &[], None).await?)
    }
}

fn unwrap_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    Ok(serde_json::from_value(value)?)
}

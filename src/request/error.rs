use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please log in again";
pub const NETWORK_ERROR_MESSAGE: &str = "Network Error";
pub const GENERIC_ERROR_MESSAGE: &str = "Error";

/// Everything a backend call (or a session operation built on one) can fail with.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Bad credentials on login.
    #[error("authentication failed: {message}")]
    AuthFailure { message: String },
    /// The backend answered 401 to an authenticated call.
    #[error("session expired: {message}")]
    SessionExpired { message: String },
    /// No response was received (connection failure or timeout).
    #[error("network error: {message}")]
    NetworkError { message: String },
    /// Any other non-success status.
    #[error("backend error ({status}): {message}")]
    BackendError { status: StatusCode, message: String },
    /// The current-user endpoint answered with nothing usable.
    #[error("verification failed, please log in again")]
    UnexpectedEmptyUser,
    /// A user lookup was requested without a token.
    #[error("no session token")]
    MissingToken,
    /// The payload did not have the expected shape.
    #[error("unexpected response payload: {0}")]
    Decode(String),
    #[error("failed to build http client: {0}")]
    Client(String),
}

impl ApiError {
    /// The HTTP status behind this error, when there was a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::AuthFailure { .. } | ApiError::SessionExpired { .. } => {
                Some(StatusCode::UNAUTHORIZED)
            }
            ApiError::BackendError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Builds the error for a failed response, taking the message from the
    /// backend's `{"error": "..."}` body when there is one.
    pub(crate) fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let message = error_message(body);
        if status == StatusCode::UNAUTHORIZED {
            ApiError::SessionExpired { message }
        } else {
            ApiError::BackendError { status, message }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}

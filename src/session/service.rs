use async_trait::async_trait;

use crate::models::{LoginResponse, User};
use crate::request::ApiError;

/// The backend operations the session store depends on.
///
/// Passed into the store's operations rather than owned by it, so the
/// request pipeline can hold the store without a reference cycle.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError>;
    /// `Ok(None)` when the backend answered with an empty payload.
    async fn get_info(&self) -> Result<Option<User>, ApiError>;
}

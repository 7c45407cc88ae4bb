use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use super::AuthService;
use crate::models::{Session, SessionState, User};
use crate::request::ApiError;
use crate::storage::TokenStorage;
use crate::utils::mask::mask_token;

/// Sole owner of the client session. Every mutation replaces the whole
/// [`Session`] in one write, so readers never see a token/user mismatch.
pub struct SessionStore {
    state: RwLock<Session>,
    storage: Arc<dyn TokenStorage>,
}

impl SessionStore {
    /// An anonymous store that ignores whatever the storage holds.
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        SessionStore {
            state: RwLock::new(Session::anonymous()),
            storage,
        }
    }

    /// Start-up: pick up a previously persisted token. The user stays
    /// unresolved until someone calls [`SessionStore::get_info`].
    pub async fn rehydrate(storage: Arc<dyn TokenStorage>) -> Self {
        let session = match storage.get().await {
            Ok(Some(token)) if !token.is_empty() => {
                info!("Rehydrated session token {}", mask_token(&token));
                Session::with_token(token)
            }
            Ok(_) => {
                debug!("No persisted token; starting anonymous");
                Session::anonymous()
            }
            Err(e) => {
                warn!("Could not read persisted token, starting anonymous: {}", e);
                Session::anonymous()
            }
        };
        SessionStore {
            state: RwLock::new(session),
            storage,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token().map(str::to_string)
    }

    pub fn user(&self) -> Option<User> {
        self.read().user().cloned()
    }

    pub fn is_admin(&self) -> bool {
        self.read().is_admin()
    }

    pub fn state(&self) -> SessionState {
        self.read().state()
    }

    /// Logs in with the username trimmed of surrounding whitespace. On
    /// failure the session is left exactly as it was.
    pub async fn login(
        &self,
        auth: &dyn AuthService,
        username: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        let username = username.trim();
        let response = auth.login(username, password).await?;

        *self.write() = Session::authenticated(response.token.clone(), response.user.clone());
        info!(
            event_name = "session.login",
            event_domain = "session",
            user_id = response.user.id,
            "User '{}' logged in",
            response.user.username
        );

        if let Err(e) = self.storage.set(&response.token).await {
            warn!("Could not persist session token: {}", e);
        }
        Ok(response.user)
    }

    /// Resolves the user behind the current token.
    ///
    /// An empty answer fails with [`ApiError::UnexpectedEmptyUser`] and leaves
    /// the session untouched. If the token was reset or replaced while the
    /// call was in flight, the stale user is returned but not stored.
    pub async fn get_info(&self, auth: &dyn AuthService) -> Result<User, ApiError> {
        let token = self.token().ok_or(ApiError::MissingToken)?;
        let user = auth
            .get_info()
            .await?
            .ok_or(ApiError::UnexpectedEmptyUser)?;

        let mut state = self.write();
        if state.token() == Some(token.as_str()) {
            if let Some(resolved) = state.resolve(user.clone()) {
                *state = resolved;
                debug!("Resolved user '{}' for current token", user.username);
            }
        } else {
            debug!("Session changed while resolving user; discarding stale result");
        }
        Ok(user)
    }

    pub async fn logout(&self) {
        info!(event_name = "session.logout", event_domain = "session", "Logging out");
        self.clear().await;
    }

    /// Back to anonymous from any state. Never fails; repeated calls are no-ops.
    pub async fn reset_token(&self) {
        debug!("Resetting session token");
        self.clear().await;
    }

    async fn clear(&self) {
        *self.write() = Session::anonymous();
        if let Err(e) = self.storage.remove().await {
            warn!("Could not remove persisted session token: {}", e);
        }
    }
}

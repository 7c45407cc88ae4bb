//! Shared application state.
//!
//! Wires exactly one of each core component: token storage, session store,
//! shell, request pipeline, backend wrappers, website store and router.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::api::{AdminApi, AuthApi, WebsiteApi};
use crate::config::ConfigV1;
use crate::models::User;
use crate::request::{ApiClient, ApiError};
use crate::router::{default_routes, Guard, Router};
use crate::session::SessionStore;
use crate::shell::Shell;
use crate::storage::{create_token_storage, TokenStorage};
use crate::websites::WebsiteStore;

/// The application context, constructed once and handed to whoever needs it.
pub struct App {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Event bus for notices, loading state and navigation requests.
    pub shell: Shell,
    /// The one session of this application.
    pub session: Arc<SessionStore>,
    /// Request pipeline shared by every backend wrapper.
    pub client: Arc<ApiClient>,
    pub auth: Arc<AuthApi>,
    pub admin: AdminApi,
    pub websites: WebsiteApi,
    /// Last fetched website list, current website and its statistics.
    pub website_store: WebsiteStore,
    pub router: Router,
}

impl App {
    /// Builds the application with the storage backend named in the config.
    pub async fn from_config(config: ConfigV1) -> Result<Self, ApiError> {
        let storage = create_token_storage(&config.storage);
        Self::with_storage(config, storage).await
    }

    /// Builds the application on top of an already constructed token storage.
    pub async fn with_storage(
        config: ConfigV1,
        storage: Arc<dyn TokenStorage>,
    ) -> Result<Self, ApiError> {
        let config = Arc::new(config);
        let session = Arc::new(SessionStore::rehydrate(storage).await);
        let shell = Shell::new(Duration::from_millis(config.notifications.duration_ms));

        let client = Arc::new(ApiClient::new(
            &config.api,
            &config.notifications,
            session.clone(),
            shell.clone(),
        )?);
        let auth = Arc::new(AuthApi::new(client.clone()));
        let guard = Guard::new(session.clone(), auth.clone());
        let router = Router::new(default_routes(), guard, &shell);

        info!("Application ready (session {:?})", session.state());

        Ok(App {
            admin: AdminApi::new(client.clone()),
            websites: WebsiteApi::new(client.clone()),
            website_store: WebsiteStore::new(),
            config,
            shell,
            session,
            client,
            auth,
            router,
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        self.session
            .login(self.auth.as_ref(), username, password)
            .await
    }

    pub async fn get_info(&self) -> Result<User, ApiError> {
        self.session.get_info(self.auth.as_ref()).await
    }

    pub async fn logout(&self) {
        self.session.logout().await
    }
}

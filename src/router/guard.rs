use std::sync::Arc;

use tracing::{debug, info, warn};

use super::routes::RouteDescriptor;
use crate::request::LOGIN_PATH;
use crate::session::{AuthService, SessionStore};

/// Where the application root lives; non-admins are sent here from admin pages.
pub const ROOT_PATH: &str = "/";

/// The single terminal outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Go to the login page, coming back to `redirect` afterwards.
    RedirectToLogin { redirect: String },
    RedirectToRoot,
}

impl Decision {
    /// The path to navigate to instead, if this is a redirect.
    pub fn location(&self) -> Option<String> {
        match self {
            Decision::Allow => None,
            Decision::RedirectToLogin { redirect } => {
                Some(format!("{}?redirect={}", LOGIN_PATH, redirect))
            }
            Decision::RedirectToRoot => Some(ROOT_PATH.to_string()),
        }
    }
}

/// Decides whether a route may be entered. Never mutates the session
/// itself; it only calls the store's own operations.
pub struct Guard {
    session: Arc<SessionStore>,
    auth: Arc<dyn AuthService>,
}

impl Guard {
    pub fn new(session: Arc<SessionStore>, auth: Arc<dyn AuthService>) -> Self {
        Guard { session, auth }
    }

    pub async fn check(&self, route: &RouteDescriptor) -> Decision {
        if !route.requires_auth {
            return Decision::Allow;
        }

        let to_login = || Decision::RedirectToLogin {
            redirect: route.path.clone(),
        };

        if self.session.token().is_none() {
            debug!("No token for protected route '{}'", route.path);
            return to_login();
        }

        let is_admin = match self.session.user() {
            Some(user) => user.is_admin(),
            None => {
                // Hold the navigation until the user is known.
                match self.session.get_info(self.auth.as_ref()).await {
                    // The fetched user decides even if a concurrent reset kept the store from recording it.
                    Ok(user) => user.is_admin(),
                    Err(e) => {
                        warn!(
                            event_name = "guard.user_resolution_failed",
                            event_domain = "router",
                            "Could not resolve user for '{}': {}",
                            route.path,
                            e
                        );
                        self.session.reset_token().await;
                        return to_login();
                    }
                }
            }
        };

        if route.requires_admin && !is_admin {
            info!("Non-admin user denied '{}'", route.path);
            return Decision::RedirectToRoot;
        }
        Decision::Allow
    }
}

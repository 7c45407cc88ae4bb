use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use thiserror::Error;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use super::guard::Guard;
use super::routes::{path_only, RouteTable};
use crate::shell::{Shell, ShellEvent};

const APP_NAME: &str = "aq3stat";
const DEFAULT_TITLE: &str = "aq3stat - Website Statistics";
/// Upper bound on route and guard redirects followed for one push.
const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no route matches '{0}'")]
    NotFound(String),
    #[error("too many redirects while navigating to '{0}'")]
    TooManyRedirects(String),
}

/// Where the application currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub full_path: String,
    pub name: Option<String>,
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    /// Window title for this page.
    pub title: String,
}

pub struct Router {
    table: RouteTable,
    guard: Guard,
    requests: Mutex<broadcast::Receiver<ShellEvent>>,
    current: RwLock<Option<Location>>,
}

impl Router {
    /// Subscribes to `shell` so navigation requested elsewhere (e.g. by the
    /// request pipeline on a 401) can be applied with [`Router::drain_redirects`].
    pub fn new(table: RouteTable, guard: Guard, shell: &Shell) -> Self {
        Router {
            table,
            guard,
            requests: Mutex::new(shell.subscribe()),
            current: RwLock::new(None),
        }
    }

    pub fn current(&self) -> Option<Location> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Navigates to `target`, following route redirects and guard decisions
    /// until a page is allowed.
    pub async fn push(&self, target: &str) -> Result<Location, NavigationError> {
        let mut next = target.to_string();

        for _ in 0..=MAX_REDIRECTS {
            let matched = self
                .table
                .resolve(&next)
                .ok_or_else(|| NavigationError::NotFound(next.clone()))?;

            if let Some(redirect) = &matched.redirect {
                debug!("Route '{}' redirects to '{}'", matched.path, redirect);
                next = redirect.clone();
                continue;
            }

            let decision = self.guard.check(&matched.descriptor()).await;
            if let Some(location) = decision.location() {
                info!(
                    event_name = "router.redirect",
                    event_domain = "router",
                    "Guard redirected '{}' to '{}'",
                    matched.path,
                    location
                );
                next = location;
                continue;
            }

            let location = Location {
                path: matched.path.clone(),
                full_path: next.clone(),
                name: matched.name.clone(),
                params: matched.params.clone(),
                query: parse_query(&next),
                title: page_title(matched.title.as_deref()),
            };
            debug!("Entered '{}'", location.full_path);
            *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(location.clone());
            return Ok(location);
        }

        warn!("Gave up navigating to '{}'", target);
        Err(NavigationError::TooManyRedirects(target.to_string()))
    }

    /// Applies every navigation request published on the shell since the last call.
    pub async fn drain_redirects(&self) -> Vec<Result<Location, NavigationError>> {
        let targets = self.pending_requests();
        let mut outcomes = Vec::with_capacity(targets.len());
        for target in targets {
            outcomes.push(self.push(&target).await);
        }
        outcomes
    }

    fn pending_requests(&self) -> Vec<String> {
        let mut receiver = self.requests.lock().unwrap_or_else(|e| e.into_inner());
        let mut targets = Vec::new();
        loop {
            match receiver.try_recv() {
                Ok(ShellEvent::Navigate(path)) => targets.push(path),
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Router missed {} shell events", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        targets
    }
}

fn page_title(title: Option<&str>) -> String {
    match title {
        Some(t) => format!("{} - {}", t, APP_NAME),
        None => DEFAULT_TITLE.to_string(),
    }
}

fn parse_query(full_path: &str) -> HashMap<String, String> {
    let rest = &full_path[path_only(full_path).len()..];
    let query = rest.strip_prefix('?').unwrap_or("");
    let query = query.split('#').next().unwrap_or("");
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Group, LoginResponse, User};
    use crate::request::ApiError;
    use crate::router::routes::{default_routes, RouteRecord};
    use crate::session::{AuthService, SessionStore};
    use crate::storage::memory_storage::MemoryTokenStorage;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct StaticAuth(Option<User>);

    #[async_trait]
    impl AuthService for StaticAuth {
        async fn login(&self, _u: &str, _p: &str) -> Result<LoginResponse, ApiError> {
            Err(ApiError::AuthFailure {
                message: "not used".to_string(),
            })
        }

        async fn get_info(&self) -> Result<Option<User>, ApiError> {
            Ok(self.0.clone())
        }
    }

    async fn router(token: Option<&str>, user: Option<User>) -> (Router, Shell) {
        let storage = match token {
            Some(t) => Arc::new(MemoryTokenStorage::with_token(t)),
            None => Arc::new(MemoryTokenStorage::new()),
        };
        let session = Arc::new(SessionStore::rehydrate(storage).await);
        let shell = Shell::default();
        let guard = Guard::new(session, Arc::new(StaticAuth(user)));
        (Router::new(default_routes(), guard, &shell), shell)
    }

    fn member(is_admin: bool) -> User {
        User {
            id: 1,
            group: Some(Group {
                is_admin,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_query() {
        let query = parse_query("/login?redirect=/admin/users&x");
        assert_eq!(query.get("redirect").map(String::as_str), Some("/admin/users"));
        assert_eq!(query.get("x").map(String::as_str), Some(""));
        assert!(parse_query("/login").is_empty());
    }

    #[test]
    fn test_page_title() {
        assert_eq!(page_title(Some("Login")), "Login - aq3stat");
        assert_eq!(page_title(None), DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn test_anonymous_redirected_to_login_with_return_path() {
        let (router, _shell) = router(None, None).await;
        let location = router.push("/admin/users").await.unwrap();
        assert_eq!(location.path, "/login");
        assert_eq!(location.full_path, "/login?redirect=/admin/users");
        assert_eq!(location.title, "Login - aq3stat");
        assert_eq!(router.current(), Some(location));
    }

    #[tokio::test]
    async fn test_root_lands_on_dashboard() {
        let (router, _shell) = router(Some("abc"), Some(member(false))).await;
        let location = router.push("/").await.unwrap();
        assert_eq!(location.name.as_deref(), Some("Dashboard"));
    }

    #[tokio::test]
    async fn test_non_admin_ends_on_dashboard() {
        let (router, _shell) = router(Some("abc"), Some(member(false))).await;
        let location = router.push("/admin/users").await.unwrap();
        assert_eq!(location.path, "/dashboard");
    }

    #[tokio::test]
    async fn test_unknown_page_goes_to_404() {
        let (router, _shell) = router(None, None).await;
        let location = router.push("/nowhere").await.unwrap();
        assert_eq!(location.path, "/404");
    }

    #[tokio::test]
    async fn test_params_are_extracted() {
        let (router, _shell) = router(Some("abc"), Some(member(false))).await;
        let location = router.push("/websites/edit/3").await.unwrap();
        assert_eq!(location.params.get("id").map(String::as_str), Some("3"));
    }

    #[tokio::test]
    async fn test_redirect_loop_is_bounded() {
        let storage = Arc::new(MemoryTokenStorage::new());
        let session = Arc::new(SessionStore::new(storage));
        let shell = Shell::default();
        let guard = Guard::new(session, Arc::new(StaticAuth(None)));
        let table = RouteTable::new(&[
            RouteRecord::new("/a").redirect("/b"),
            RouteRecord::new("/b").redirect("/a"),
        ]);
        let router = Router::new(table, guard, &shell);
        assert_eq!(
            router.push("/a").await,
            Err(NavigationError::TooManyRedirects("/a".to_string()))
        );
    }

    #[tokio::test]
    async fn test_no_match_without_catch_all() {
        let session = Arc::new(SessionStore::new(Arc::new(MemoryTokenStorage::new())));
        let shell = Shell::default();
        let guard = Guard::new(session, Arc::new(StaticAuth(None)));
        let router = Router::new(RouteTable::new(&[RouteRecord::new("/login")]), guard, &shell);
        assert_eq!(
            router.push("/x").await,
            Err(NavigationError::NotFound("/x".to_string()))
        );
    }

    #[tokio::test]
    async fn test_drain_applies_shell_navigation_only() {
        let (router, shell) = router(None, None).await;
        shell.error("ignored by the router");
        shell.navigate("/login");
        let outcomes = router.drain_redirects().await;
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].as_ref().unwrap().path, "/login");
        assert!(router.drain_redirects().await.is_empty());
    }
}

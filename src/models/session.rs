use serde::Serialize;

use super::user::User;

/// The client session: a token and, once resolved, the user it belongs to.
///
/// Fields are private so that the only ways to build one keep
/// `user.is_some() => token.is_some()`.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

/// Lifecycle states of a [`Session`].
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    TokenOnly,
    Authenticated,
}

impl Session {
    pub fn anonymous() -> Self {
        Session::default()
    }

    /// A token is known but the user has not been resolved yet.
    pub fn with_token(token: String) -> Self {
        Session {
            token: Some(token),
            user: None,
        }
    }

    pub fn authenticated(token: String, user: User) -> Self {
        Session {
            token: Some(token),
            user: Some(user),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Derived, never stored.
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    pub fn state(&self) -> SessionState {
        match (&self.token, &self.user) {
            (None, _) => SessionState::Anonymous,
            (Some(_), None) => SessionState::TokenOnly,
            (Some(_), Some(_)) => SessionState::Authenticated,
        }
    }

    /// Attach a resolved user. Returns `None` when there is no token to attach it to.
    pub fn resolve(&self, user: User) -> Option<Session> {
        self.token
            .clone()
            .map(|token| Session::authenticated(token, user))
    }
}

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The user profile returned by the backend. Only `group.is_admin` drives
/// client behaviour; everything else is carried along for display.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub group: Option<Group>,
    /// Any remaining fields (phone, address, timestamps...).
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl User {
    /// True only when the user carries a group flagged as admin.
    pub fn is_admin(&self) -> bool {
        self.group.as_ref().is_some_and(|g| g.is_admin)
    }
}

/// A user group with its permission flags.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Group {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Body of a successful `POST /auth/login`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

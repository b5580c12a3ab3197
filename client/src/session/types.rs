//! Session data model: the authenticated user profile and the session pair.
//!
//! DESIGN
//! ======
//! `token` alone defines "authenticated". `user` is advisory and may be absent
//! while a token is present (profile not loaded yet, or a corrupted profile
//! record was discarded), so nothing here treats the pair as atomic.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};

/// Role code that grants administrator access.
pub const ADMIN_ROLE: &str = "ADMIN";

/// Role attached to a user profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Machine-readable role code (e.g. `"ADMIN"`, `"VET"`).
    #[serde(default)]
    pub code: String,
    /// Display name, when the API sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Role {
    pub fn new(code: &str) -> Self {
        Self { code: code.to_owned(), name: None }
    }
}

/// Profile of the signed-in user, as returned by the API and persisted in
/// the browser-local profile record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Absent, `null`, or non-array role lists deserialize as empty.
    #[serde(default, deserialize_with = "deserialize_roles_lenient")]
    pub roles: Vec<Role>,
}

impl User {
    pub fn has_role(&self, code: &str) -> bool {
        self.roles.iter().any(|role| role.code == code)
    }
}

/// Accept any JSON for `roles`; anything but an array of role objects yields
/// no roles instead of a parse failure.
fn deserialize_roles_lenient<'de, D>(deserializer: D) -> Result<Vec<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Role>(item).ok())
        .collect())
}

/// In-memory session state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.has_role(ADMIN_ROLE))
    }
}

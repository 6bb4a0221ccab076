//! User documents.

use serde::{Deserialize, Serialize};
use tableau_shared::types::UserId;

/// An email address registered for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEmail {
    /// Address.
    pub address: String,
    /// Whether the address was verified.
    #[serde(default)]
    pub verified: bool,
}

/// An application user. Users are global, not scoped to a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Login name. System and service accounts have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Registered email addresses.
    #[serde(default)]
    pub emails: Vec<UserEmail>,
    /// Free-form profile, kept as stored.
    #[serde(default)]
    pub profile: serde_json::Value,
    /// Whether the user administers the instance.
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// Creates a user with the given username.
    #[must_use]
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: Some(username.into()),
            emails: Vec::new(),
            profile: serde_json::Value::Null,
            is_admin: false,
        }
    }

    /// Returns true if the user has a non-empty username.
    #[must_use]
    pub fn has_username(&self) -> bool {
        self.username.as_deref().is_some_and(|name| !name.is_empty())
    }
}

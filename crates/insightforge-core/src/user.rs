//! Session user domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The logged-in user for the current session.
///
/// Created on login with a locally generated identifier and cleared on
/// logout. There is no real authentication behind this; the username is
/// taken at face value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Locally generated identifier (`user-<uuid>`)
    pub id: String,
    /// Display name entered at login
    pub username: String,
}

impl User {
    /// Mints a new user for a login with the given display name.
    pub fn login(username: impl Into<String>) -> Self {
        Self {
            id: format!("user-{}", Uuid::new_v4()),
            username: username.into(),
        }
    }
}

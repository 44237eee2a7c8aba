//! Caller identity and roles.
//!
//! An `Identity` is resolved once at authentication time and passed
//! explicitly to every operation. It is immutable for the lifetime of a
//! session; the store never reads ambient session state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype for a registered user's id to prevent mixing with other numeric ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// What a caller is allowed to do.
///
/// Editors upload and delete their own videos; clients review them
/// (approve or request changes). Commenting is open to both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Editor,
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Editor => write!(f, "editor"),
            Role::Client => write!(f, "client"),
        }
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub display_name: String,
}

impl Identity {
    pub fn new(
        id: impl Into<UserId>,
        email: impl Into<String>,
        role: Role,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role,
            display_name: display_name.into(),
        }
    }
}

//! Error kinds shared across the service.
//!
//! Every operation reports failures as one of these typed kinds; nothing is
//! silently swallowed. `Conflict` is the only kind a caller should retry
//! (re-issue with fresh state).

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    /// Email/password pair does not match a registered credential.
    InvalidCredentials,
    /// The caller's role (or identity) does not permit this operation.
    Unauthorized(String),
    /// The referenced video does not exist in the active set.
    NotFound(String),
    /// A required field was empty or missing.
    InvalidInput(String),
    /// The requested status change is not legal from the current status.
    InvalidTransition(String),
    /// A concurrent write won the race; retry with fresh state.
    Conflict(String),
}

impl ReviewError {
    /// Stable wire code for structured error responses.
    pub fn code(&self) -> &'static str {
        match self {
            ReviewError::InvalidCredentials => "invalid_credentials",
            ReviewError::Unauthorized(_) => "unauthorized",
            ReviewError::NotFound(_) => "not_found",
            ReviewError::InvalidInput(_) => "invalid_input",
            ReviewError::InvalidTransition(_) => "invalid_transition",
            ReviewError::Conflict(_) => "conflict",
        }
    }
}

impl fmt::Display for ReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewError::InvalidCredentials => write!(f, "invalid credentials"),
            ReviewError::Unauthorized(msg) => write!(f, "unauthorized: {msg}"),
            ReviewError::NotFound(msg) => write!(f, "not found: {msg}"),
            ReviewError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            ReviewError::InvalidTransition(msg) => write!(f, "invalid transition: {msg}"),
            ReviewError::Conflict(msg) => write!(f, "conflict: {msg}"),
        }
    }
}

impl std::error::Error for ReviewError {}

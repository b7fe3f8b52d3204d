//! Error types for the Workout Tracker application

use thiserror::Error;

/// Authentication error types
///
/// These describe why a bearer token was rejected. They are logged
/// server-side; clients only ever see a fixed message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Missing token")]
    MissingToken,
}

/// Field validation failure carrying the human-readable messages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Validation failed: {}", .0.join("; "))]
pub struct ValidationFailure(pub Vec<String>);

impl ValidationFailure {
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0
    }
}

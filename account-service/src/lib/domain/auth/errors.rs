use thiserror::Error;

use crate::user::errors::UserError;

/// Login failures.
///
/// `UserNotFound` and `InvalidCredentials` stay distinct for logging but are
/// rendered identically by both transports.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No user registered for this email")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password verification failed: {0}")]
    Hashing(String),

    #[error("Token issuance failed: {0}")]
    Issuance(String),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl AuthError {
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, AuthError::UserNotFound | AuthError::InvalidCredentials)
    }
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        AuthError::Repository(err.to_string())
    }
}

impl From<auth::AuthenticationError> for AuthError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
            auth::AuthenticationError::PasswordError(e) => AuthError::Hashing(e.to_string()),
            auth::AuthenticationError::JwtError(e) => AuthError::Issuance(e.to_string()),
        }
    }
}

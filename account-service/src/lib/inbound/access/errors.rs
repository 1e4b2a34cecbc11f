use thiserror::Error;

/// Reasons a call is refused at the transport boundary.
///
/// The variants exist for logs only. Callers always see
/// [`AccessError::PUBLIC_MESSAGE`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("missing authorization header")]
    MissingCredentials,

    #[error("malformed authorization header")]
    MalformedCredentials,

    #[error("token rejected: {0}")]
    InvalidToken(String),

    #[error("caller does not own the target record")]
    ForeignTarget,
}

impl AccessError {
    pub const PUBLIC_MESSAGE: &'static str = "unauthenticated";

    pub fn public_message(&self) -> &'static str {
        Self::PUBLIC_MESSAGE
    }
}

use auth::AuthenticationResult;

/// Bearer token handed to a caller after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    /// Unix timestamp after which the token is rejected
    pub expires_at: i64,
}

impl From<AuthenticationResult> for AccessToken {
    fn from(result: AuthenticationResult) -> Self {
        Self {
            token: result.access_token,
            expires_at: result.expires_at,
        }
    }
}

use std::sync::Arc;
use std::time::Duration;

use super::claims::Claims;
use super::errors::JwtError;
use super::handler::JwtHandler;
use crate::clock::Clock;
use crate::clock::SystemClock;

/// A freshly signed access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    /// Expiry as Unix timestamp
    pub expires_at: i64,
}

/// Issues and verifies signed, time-bounded identity tokens.
///
/// Stateless after construction: the secret, time-to-live and clock never
/// change, so a single instance can be shared across concurrent calls.
/// There is no revocation; expiry is the only way a token stops being valid.
pub struct TokenAuthority {
    handler: JwtHandler,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenAuthority {
    /// Create a token authority backed by the system clock.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self::with_clock(secret, ttl, Arc::new(SystemClock))
    }

    /// Create a token authority with an explicit time source.
    pub fn with_clock(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            handler: JwtHandler::new(secret),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for the given subject.
    ///
    /// # Arguments
    /// * `subject` - User identifier placed in `sub`
    /// * `email` - Email placed in `eml`
    ///
    /// # Returns
    /// Encoded token and its expiry (now + ttl)
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue(&self, subject: &str, email: &str) -> Result<IssuedToken, JwtError> {
        let ttl_seconds = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let expires_at = self.clock.now().saturating_add(ttl_seconds);

        let claims = Claims::new(subject, email, expires_at);
        let token = self.handler.encode(&claims)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature does not match
    /// * `DecodingFailed` - Token is structurally malformed
    /// * `MissingClaim` - Subject is empty or a required claim is absent
    /// * `TokenExpired` - Current time is at or past `exp`
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let claims: Claims = self.handler.decode(token)?;

        if claims.is_expired(self.clock.now()) {
            return Err(JwtError::TokenExpired);
        }

        if claims.sub.is_empty() {
            return Err(JwtError::MissingClaim("sub".to_string()));
        }

        Ok(claims)
    }
}

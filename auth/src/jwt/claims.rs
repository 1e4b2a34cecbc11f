use serde::Deserialize;
use serde::Serialize;

/// Identity claims carried by an access token.
///
/// Fixed shape: every field is required when decoding, so a token missing
/// one of them fails structurally instead of yielding a partial identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Email of the subject at issuance time. Informational only.
    pub eml: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(subject: impl ToString, email: impl ToString, expires_at: i64) -> Self {
        Self {
            sub: subject.to_string(),
            eml: email.to_string(),
            exp: expires_at,
        }
    }

    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn email(&self) -> &str {
        &self.eml
    }

    /// Check if token is expired.
    ///
    /// A token stops being valid at the exact second of its expiry.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}

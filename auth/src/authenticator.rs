use crate::jwt::Claims;
use crate::jwt::IssuedToken;
use crate::jwt::JwtError;
use crate::jwt::TokenAuthority;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and the token authority.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_authority: TokenAuthority,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
    /// Expiry of the access token (Unix timestamp)
    pub expires_at: i64,
}

impl From<IssuedToken> for AuthenticationResult {
    fn from(issued: IssuedToken) -> Self {
        Self {
            access_token: issued.token,
            expires_at: issued.expires_at,
        }
    }
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `password_hasher` - Hasher configured with the deployment's work factor
    /// * `token_authority` - Token signer/verifier holding the server secret
    pub fn new(password_hasher: PasswordHasher, token_authority: TokenAuthority) -> Self {
        Self {
            password_hasher,
            token_authority,
        }
    }

    pub fn password_hasher(&self) -> &PasswordHasher {
        &self.password_hasher
    }

    pub fn token_authority(&self) -> &TokenAuthority {
        &self.token_authority
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Compare a password with a stored hash.
    ///
    /// # Errors
    /// * `PasswordError` - Stored hash is malformed
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and generate an access token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - User identifier for the token
    /// * `email` - User email for the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        email: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let issued = self.token_authority.issue(subject, email)?;

        Ok(issued.into())
    }

    /// Generate a token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn generate_token(&self, subject: &str, email: &str) -> Result<IssuedToken, JwtError> {
        self.token_authority.issue(subject, email)
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed, or token expired
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.token_authority.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::clock::ManualClock;
    use crate::password::HashingCost;

    fn authenticator(clock: ManualClock) -> Authenticator {
        Authenticator::new(
            PasswordHasher::with_cost(HashingCost {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            }),
            TokenAuthority::with_clock(
                b"test_secret_key_at_least_32_bytes!",
                Duration::from_secs(60),
                Arc::new(clock),
            ),
        )
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator(ManualClock::new(1_700_000_000));

        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate(password, &hash, "user123", "a@b.com")
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());
        assert_eq!(result.expires_at, 1_700_000_060);

        let decoded = authenticator
            .validate_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(decoded.subject(), "user123");
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator(ManualClock::new(1_700_000_000));

        let hash = authenticator
            .hash_password("rightpass")
            .expect("Failed to hash password");

        let result = authenticator.authenticate("wrongpass", &hash, "user123", "a@b.com");
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_with_corrupt_hash() {
        let authenticator = authenticator(ManualClock::new(1_700_000_000));

        let result =
            authenticator.authenticate("password", "not-a-phc-string", "user123", "a@b.com");
        assert!(matches!(
            result,
            Err(AuthenticationError::PasswordError(PasswordError::VerificationFailed(_)))
        ));
    }

    #[test]
    fn test_generate_and_validate_token() {
        let clock = ManualClock::new(1_700_000_000);
        let authenticator = authenticator(clock.clone());

        let issued = authenticator
            .generate_token("user123", "a@b.com")
            .expect("Failed to generate token");

        let decoded = authenticator
            .validate_token(&issued.token)
            .expect("Failed to validate token");
        assert_eq!(decoded.subject(), "user123");

        clock.advance(61);
        assert!(matches!(
            authenticator.validate_token(&issued.token),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = authenticator(ManualClock::new(1_700_000_000));

        let result = authenticator.validate_token("invalid.token.here");
        assert!(result.is_err());
    }
}

use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AccessToken;
use crate::domain::user::models::EmailAddress;

/// Port for credential login.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Exchange an email and password for a signed access token.
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this email
    /// * `InvalidCredentials` - Password does not match the stored hash
    /// * `Hashing` - Stored hash could not be verified
    /// * `Issuance` - Token signing failed
    /// * `Repository` - Lookup failed
    async fn login(&self, email: &EmailAddress, password: &str)
        -> Result<AccessToken, AuthError>;
}

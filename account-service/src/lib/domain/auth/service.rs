use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AccessToken;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::EmailAddress;
use crate::user::ports::UserRepository;

/// Login orchestration over the repository and the authenticator.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn login(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<AccessToken, AuthError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let result = self.authenticator.authenticate(
            password,
            &user.password_hash,
            &user.id.to_string(),
            user.email.as_str(),
        )?;

        tracing::info!(user_id = %user.id, expires_at = result.expires_at, "Token issued");

        Ok(result.into())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use auth::ManualClock;
    use auth::TokenAuthority;

    use super::*;
    use crate::domain::user::service::tests::fast_hasher;
    use crate::domain::user::service::tests::sample_user;
    use crate::domain::user::service::tests::MockTestUserRepository;
    use crate::user::errors::UserError;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    fn authenticator(clock: ManualClock) -> Arc<Authenticator> {
        Arc::new(Authenticator::new(
            fast_hasher(),
            TokenAuthority::with_clock(SECRET, Duration::from_secs(60), Arc::new(clock)),
        ))
    }

    fn email(value: &str) -> EmailAddress {
        EmailAddress::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_login_success_issues_token_for_user() {
        let mut repository = MockTestUserRepository::new();

        let mut user = sample_user("a@b.com");
        user.password_hash = fast_hasher().hash("rightpass").unwrap();
        let user_id = user.id;

        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "a@b.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let authenticator = authenticator(ManualClock::new(1_000));
        let service = AuthService::new(Arc::new(repository), Arc::clone(&authenticator));

        let token = service.login(&email("A@B.com "), "rightpass").await.unwrap();
        assert_eq!(token.expires_at, 1_060);

        let claims = authenticator.validate_token(&token.token).unwrap();
        assert_eq!(claims.subject(), user_id.to_string());
        assert_eq!(claims.email(), "a@b.com");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut repository = MockTestUserRepository::new();

        let mut user = sample_user("a@b.com");
        user.password_hash = fast_hasher().hash("rightpass").unwrap();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(Arc::new(repository), authenticator(ManualClock::new(0)));

        let result = service.login(&email("a@b.com"), "wrongpass").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(repository), authenticator(ManualClock::new(0)));

        let err = service
            .login(&email("nobody@b.com"), "rightpass")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
        assert!(err.is_credential_failure());
    }

    #[tokio::test]
    async fn test_login_malformed_stored_hash() {
        let mut repository = MockTestUserRepository::new();

        let user = sample_user("a@b.com");

        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(Arc::new(repository), authenticator(ManualClock::new(0)));

        let err = service.login(&email("a@b.com"), "rightpass").await.unwrap_err();
        assert!(matches!(err, AuthError::Hashing(_)));
        assert!(!err.is_credential_failure());
    }

    #[tokio::test]
    async fn test_login_repository_error() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("pool timed out".to_string())));

        let service = AuthService::new(Arc::new(repository), authenticator(ManualClock::new(0)));

        let result = service.login(&email("a@b.com"), "rightpass").await;
        assert!(matches!(result, Err(AuthError::Repository(_))));
    }
}

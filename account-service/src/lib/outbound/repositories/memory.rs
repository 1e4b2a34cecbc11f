use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Pagination;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user store kept in insertion order.
///
/// Selected with `database.backend = "memory"`; also backs the router and
/// integration tests.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<UserId, UserError> {
        let mut users = self.users.write().await;

        if users.iter().any(|existing| existing.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        let id = user.id;
        users.push(user);
        Ok(id)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.email == *email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.users.read().await.clone())
    }

    async fn list(&self, pagination: &Pagination) -> Result<Vec<User>, UserError> {
        let users = self.users.read().await;
        let skip = usize::try_from(pagination.skip()).unwrap_or(usize::MAX);
        let take = match pagination.limit {
            0 => usize::MAX,
            limit => usize::try_from(limit).unwrap_or(usize::MAX),
        };

        Ok(users.iter().skip(skip).take(take).cloned().collect())
    }

    async fn update(&self, id: &UserId, changes: &UpdateUserCommand) -> Result<(), UserError> {
        let mut users = self.users.write().await;

        let position = users
            .iter()
            .position(|user| user.id == *id)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        if let Some(email) = &changes.email {
            if users.iter().any(|user| user.email == *email && user.id != *id) {
                return Err(UserError::EmailAlreadyExists(email.to_string()));
            }
        }

        let user = &mut users[position];
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }

        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|user| user.id != *id);

        if users.len() == before {
            return Err(UserError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, UserError> {
        Ok(self.users.read().await.len() as u64)
    }
}

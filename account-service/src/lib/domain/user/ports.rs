use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Pagination;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for user domain service operations.
///
/// Transport independent. Ownership of mutated records is checked at the
/// transport boundary, never here.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Validated name, normalized email and plaintext password
    ///
    /// # Returns
    /// Identifier of the stored user
    ///
    /// # Errors
    /// * `Hashing` - Password hashing failed
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<UserId, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Retrieve every stored user.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn get_all(&self) -> Result<Vec<User>, UserError>;

    /// Retrieve one page of users.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list(&self, pagination: &Pagination) -> Result<Vec<User>, UserError>;

    /// Update name and/or email of an existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<(), UserError>;

    /// Delete existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;

    /// Number of stored users.
    async fn count_users(&self) -> Result<u64, UserError>;
}

/// Persistence capability for the user aggregate.
///
/// Implementations must keep email unique across all records.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<UserId, UserError>;

    /// Retrieve user by identifier (None if not found).
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by normalized email (None if not found).
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Retrieve all users in creation order.
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Retrieve one page of users in creation order.
    async fn list(&self, pagination: &Pagination) -> Result<Vec<User>, UserError>;

    /// Apply a partial update.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, id: &UserId, changes: &UpdateUserCommand) -> Result<(), UserError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;

    /// Number of stored users.
    async fn count(&self) -> Result<u64, UserError>;
}

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Pagination;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserName;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

const SELECT_USERS: &str = "SELECT id, name, email, password_hash, created_at FROM users";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::from_string(&row.id)?,
            name: UserName::new(row.name)?,
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

fn write_error(e: sqlx::Error, email: &str) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT) {
            return UserError::EmailAlreadyExists(email.to_string());
        }
    }
    UserError::DatabaseError(e.to_string())
}

fn read_error(e: sqlx::Error) -> UserError {
    UserError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<UserId, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id.to_string())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, user.email.as_str()))?;

        Ok(user.id)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        sqlx::query_as::<_, UserRow>(&format!("{} WHERE id = $1", SELECT_USERS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        sqlx::query_as::<_, UserRow>(&format!("{} WHERE email = $1", SELECT_USERS))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        sqlx::query_as::<_, UserRow>(&format!("{} ORDER BY created_at, id", SELECT_USERS))
            .fetch_all(&self.pool)
            .await
            .map_err(read_error)?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn list(&self, pagination: &Pagination) -> Result<Vec<User>, UserError> {
        // LIMIT NULL means no limit
        let limit = (pagination.limit > 0).then(|| to_i64(pagination.limit));

        sqlx::query_as::<_, UserRow>(&format!(
            "{} ORDER BY created_at, id LIMIT $1 OFFSET $2",
            SELECT_USERS
        ))
        .bind(limit)
        .bind(to_i64(pagination.skip()))
        .fetch_all(&self.pool)
        .await
        .map_err(read_error)?
        .into_iter()
        .map(User::try_from)
        .collect()
    }

    async fn update(&self, id: &UserId, changes: &UpdateUserCommand) -> Result<(), UserError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        let mut assignments = builder.separated(", ");
        if let Some(name) = &changes.name {
            assignments.push("name = ");
            assignments.push_bind_unseparated(name.as_str().to_string());
        }
        if let Some(email) = &changes.email {
            assignments.push("email = ");
            assignments.push_bind_unseparated(email.as_str().to_string());
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id.to_string());

        let attempted_email = changes
            .email
            .as_ref()
            .map(|email| email.as_str())
            .unwrap_or_default();

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, attempted_email))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(read_error)?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn count(&self) -> Result<u64, UserError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(read_error)?;

        Ok(count.max(0) as u64)
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

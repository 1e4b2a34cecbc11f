//! Runs against a live Postgres server:
//! `DATABASE_URL=postgresql://... cargo test --test postgres_tests -- --ignored`

mod common;

use std::sync::Arc;

use account_service::domain::user::models::EmailAddress;
use account_service::domain::user::models::Pagination;
use account_service::domain::user::models::UpdateUserCommand;
use account_service::domain::user::models::User;
use account_service::domain::user::models::UserId;
use account_service::domain::user::models::UserName;
use account_service::domain::user::ports::UserRepository;
use account_service::outbound::repositories::PostgresUserRepository;
use account_service::user::errors::UserError;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use common::TestApp;
use common::TestDb;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

fn email(value: &str) -> EmailAddress {
    EmailAddress::new(value.to_string()).unwrap()
}

fn user(name: &str, address: &str, created_at: DateTime<Utc>) -> User {
    User {
        id: UserId::new(),
        name: UserName::new(name.to_string()).unwrap(),
        email: email(address),
        password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_string(),
        created_at,
    }
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_create_and_find() {
    let db = TestDb::new().await;
    let repository = PostgresUserRepository::new(db.pool.clone());

    let alice = user("Alice", "alice@example.com", Utc::now());
    let id = repository.create(alice.clone()).await.unwrap();
    assert_eq!(id, alice.id);

    let stored = repository.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.name.as_str(), "Alice");
    assert_eq!(stored.email.as_str(), "alice@example.com");
    assert_eq!(stored.password_hash, alice.password_hash);

    let by_email = repository
        .find_by_email(&email("alice@example.com"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, id);

    assert!(repository.find_by_id(&UserId::new()).await.unwrap().is_none());
    assert_eq!(repository.count().await.unwrap(), 1);

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_duplicate_email_on_create_and_update() {
    let db = TestDb::new().await;
    let repository = PostgresUserRepository::new(db.pool.clone());

    repository
        .create(user("Alice", "alice@example.com", Utc::now()))
        .await
        .unwrap();
    let bob = repository
        .create(user("Bob", "bob@example.com", Utc::now()))
        .await
        .unwrap();

    let result = repository
        .create(user("Other", "alice@example.com", Utc::now()))
        .await;
    assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));

    let changes = UpdateUserCommand::new(None, Some(email("alice@example.com"))).unwrap();
    let result = repository.update(&bob, &changes).await;
    assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));

    assert_eq!(repository.count().await.unwrap(), 2);

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_list_pages_by_creation_time() {
    let db = TestDb::new().await;
    let repository = PostgresUserRepository::new(db.pool.clone());

    let start = Utc::now();
    for (i, address) in ["a@b.com", "c@d.com", "e@f.com"].iter().enumerate() {
        let created_at = start + Duration::seconds(i as i64);
        repository
            .create(user("Someone", address, created_at))
            .await
            .unwrap();
    }

    let emails = |users: Vec<User>| -> Vec<String> {
        users.iter().map(|u| u.email.as_str().to_string()).collect()
    };

    let all = repository.list(&Pagination::new(0, 0)).await.unwrap();
    assert_eq!(emails(all), ["a@b.com", "c@d.com", "e@f.com"]);

    let first = repository.list(&Pagination::new(0, 2)).await.unwrap();
    assert_eq!(emails(first), ["a@b.com", "c@d.com"]);

    let second = repository.list(&Pagination::new(1, 2)).await.unwrap();
    assert_eq!(emails(second), ["e@f.com"]);

    let past_end = repository.list(&Pagination::new(5, 2)).await.unwrap();
    assert!(past_end.is_empty());

    assert_eq!(repository.list_all().await.unwrap().len(), 3);

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_partial_update() {
    let db = TestDb::new().await;
    let repository = PostgresUserRepository::new(db.pool.clone());
    let id = repository
        .create(user("Alice", "alice@example.com", Utc::now()))
        .await
        .unwrap();

    let rename = UpdateUserCommand::new(Some(UserName::new("Alicia".to_string()).unwrap()), None)
        .unwrap();
    repository.update(&id, &rename).await.unwrap();

    let stored = repository.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.name.as_str(), "Alicia");
    assert_eq!(stored.email.as_str(), "alice@example.com");

    let move_email = UpdateUserCommand::new(None, Some(email("alicia@example.com"))).unwrap();
    repository.update(&id, &move_email).await.unwrap();

    let stored = repository.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.name.as_str(), "Alicia");
    assert_eq!(stored.email.as_str(), "alicia@example.com");

    let both = UpdateUserCommand::new(
        Some(UserName::new("Ali".to_string()).unwrap()),
        Some(email("ali@example.com")),
    )
    .unwrap();
    repository.update(&id, &both).await.unwrap();

    let stored = repository.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.name.as_str(), "Ali");
    assert_eq!(stored.email.as_str(), "ali@example.com");

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_missing_id_is_not_found() {
    let db = TestDb::new().await;
    let repository = PostgresUserRepository::new(db.pool.clone());
    let missing = UserId::new();

    let changes = UpdateUserCommand::new(None, Some(email("x@y.com"))).unwrap();
    assert!(matches!(
        repository.update(&missing, &changes).await,
        Err(UserError::NotFound(_))
    ));
    assert!(matches!(
        repository.delete(&missing).await,
        Err(UserError::NotFound(_))
    ));

    let id = repository
        .create(user("Alice", "alice@example.com", Utc::now()))
        .await
        .unwrap();
    repository.delete(&id).await.unwrap();
    assert!(matches!(
        repository.delete(&id).await,
        Err(UserError::NotFound(_))
    ));

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_invalid_stored_row_is_rejected() {
    let db = TestDb::new().await;
    let repository = PostgresUserRepository::new(db.pool.clone());
    let id = UserId::new();

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, created_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id.to_string())
    .bind("Alice")
    .bind("not-an-email")
    .bind("$argon2id$test_hash")
    .bind(Utc::now())
    .execute(&db.pool)
    .await
    .unwrap();

    assert!(matches!(
        repository.find_by_id(&id).await,
        Err(UserError::InvalidEmail(_))
    ));

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_http_flow_over_postgres() {
    let db = TestDb::new().await;
    let app =
        TestApp::spawn_with(Arc::new(PostgresUserRepository::new(db.pool.clone()))).await;

    let id = app.register("Alice", "alice@example.com").await;
    let token = app.login("alice@example.com").await;
    let path = format!("/api/v1/users/{}", id);

    let response = app
        .post("/api/v1/users")
        .json(&json!({
            "name": "Other",
            "email": "ALICE@example.com",
            "password": common::PASSWORD
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .put(&path)
        .bearer_auth(&token)
        .json(&json!({ "name": "Alicia" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let fetched: Value = app.get(&path).send().await.unwrap().json().await.unwrap();
    assert_eq!(fetched["data"]["name"], "Alicia");

    let response = app
        .delete(&path)
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get(&path).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    db.cleanup().await;
}

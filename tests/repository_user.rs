use sqlx::PgPool;
use std::sync::Arc;
use user_directory::domain::entities::{NewUser, PasswordHash, UserPatch};
use user_directory::domain::repositories::{CredentialRepository, UserRepository};
use user_directory::error::AppError;
use user_directory::infrastructure::persistence::PgUserRepository;

fn new_user(name: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password_hash: PasswordHash::new("stored-hash"),
    }
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_create_and_find(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    let created = repo.create(new_user("Ana", "ana@x.com")).await.unwrap();

    assert!(created.id > 0);
    assert_eq!(created.name, "Ana");

    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id, created);

    let by_email = repo.find_by_email("ana@x.com").await.unwrap().unwrap();
    assert_eq!(by_email.id, created.id);

    assert!(repo.find_by_email("ANA@x.com").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_find_missing(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    assert!(repo.find_by_id(999).await.unwrap().is_none());
    assert!(repo.find_by_email("nobody@x.com").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_duplicate_email_conflict(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    repo.create(new_user("Ana", "ana@x.com")).await.unwrap();
    let result = repo.create(new_user("Other", "ana@x.com")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_list_all_ordered_by_id(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    let a = repo.create(new_user("Ana", "ana@x.com")).await.unwrap();
    let b = repo.create(new_user("Bob", "bob@x.com")).await.unwrap();

    let users = repo.list_all().await.unwrap();

    assert_eq!(users.iter().map(|u| u.id).collect::<Vec<_>>(), vec![a.id, b.id]);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_partial_update(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    let user = repo.create(new_user("Ana", "ana@x.com")).await.unwrap();

    let patch = UserPatch {
        name: Some("Ana Maria".to_string()),
        ..Default::default()
    };
    assert!(repo.update_by_id(user.id, patch).await.unwrap());

    let updated = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(updated.name, "Ana Maria");
    assert_eq!(updated.email, "ana@x.com");
    assert!(updated.updated_at >= user.updated_at);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_update_missing_returns_false(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    let patch = UserPatch {
        name: Some("Ghost".to_string()),
        ..Default::default()
    };
    assert!(!repo.update_by_id(999, patch).await.unwrap());
    assert!(!repo.update_by_id(999, UserPatch::default()).await.unwrap());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_update_password_changes_credentials(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    let user = repo.create(new_user("Ana", "ana@x.com")).await.unwrap();

    let patch = UserPatch {
        password_hash: Some(PasswordHash::new("new-hash")),
        ..Default::default()
    };
    repo.update_by_id(user.id, patch).await.unwrap();

    let credentials = repo.find_credentials("ana@x.com").await.unwrap().unwrap();
    assert_eq!(credentials.user_id, user.id);
    assert_eq!(credentials.password_hash.as_str(), "new-hash");
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_delete(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    let user = repo.create(new_user("Ana", "ana@x.com")).await.unwrap();

    assert!(repo.delete_by_id(user.id).await.unwrap());
    assert!(repo.find_by_id(user.id).await.unwrap().is_none());
    assert!(!repo.delete_by_id(user.id).await.unwrap());
}

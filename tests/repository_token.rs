use sqlx::PgPool;
use std::sync::Arc;
use user_directory::domain::entities::{NewUser, PasswordHash};
use user_directory::domain::repositories::{TokenRepository, UserRepository};
use user_directory::infrastructure::persistence::{PgTokenRepository, PgUserRepository};

async fn create_user(pool: &PgPool, email: &str) -> i64 {
    PgUserRepository::new(Arc::new(pool.clone()))
        .create(NewUser {
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: PasswordHash::new("stored-hash"),
        })
        .await
        .unwrap()
        .id
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_create_token(pool: PgPool) {
    let user_id = create_user(&pool, "ana@x.com").await;
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo.create_token(user_id, "auth_token", "hash123").await.unwrap();

    assert_eq!(token.user_id, user_id);
    assert_eq!(token.name, "auth_token");
    assert_eq!(token.token_hash, "hash123");
    assert!(token.revoked_at.is_none());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_find_user_id(pool: PgPool) {
    let user_id = create_user(&pool, "ana@x.com").await;
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token(user_id, "auth_token", "validhash").await.unwrap();

    assert_eq!(repo.find_user_id("validhash").await.unwrap(), Some(user_id));
    assert_eq!(repo.find_user_id("nonexistent").await.unwrap(), None);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_revoked_token_not_found(pool: PgPool) {
    let user_id = create_user(&pool, "ana@x.com").await;
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token(user_id, "auth_token", "revokedhash").await.unwrap();

    assert!(repo.revoke_by_hash("revokedhash").await.unwrap());
    assert!(!repo.revoke_by_hash("revokedhash").await.unwrap());
    assert_eq!(repo.find_user_id("revokedhash").await.unwrap(), None);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_revoke_all_for_user(pool: PgPool) {
    let ana = create_user(&pool, "ana@x.com").await;
    let bob = create_user(&pool, "bob@x.com").await;
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token(ana, "auth_token", "a1").await.unwrap();
    repo.create_token(ana, "auth_token", "a2").await.unwrap();
    repo.create_token(bob, "auth_token", "b1").await.unwrap();

    assert_eq!(repo.revoke_all_for_user(ana).await.unwrap(), 2);

    assert_eq!(repo.find_user_id("a1").await.unwrap(), None);
    assert_eq!(repo.find_user_id("b1").await.unwrap(), Some(bob));
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_revoke_by_id_and_list(pool: PgPool) {
    let ana = create_user(&pool, "ana@x.com").await;
    let bob = create_user(&pool, "bob@x.com").await;
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo.create_token(ana, "auth_token", "a1").await.unwrap();
    repo.create_token(bob, "auth_token", "b1").await.unwrap();

    assert!(repo.revoke_by_id(token.id).await.unwrap());
    assert!(!repo.revoke_by_id(token.id).await.unwrap());

    let all = repo.list_tokens(None).await.unwrap();
    assert_eq!(all.len(), 2);

    let anas = repo.list_tokens(Some(ana)).await.unwrap();
    assert_eq!(anas.len(), 1);
    assert!(anas[0].revoked_at.is_some());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_update_last_used(pool: PgPool) {
    let user_id = create_user(&pool, "ana@x.com").await;
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token(user_id, "auth_token", "usedhash").await.unwrap();
    repo.update_last_used("usedhash").await.unwrap();

    let tokens = repo.list_tokens(Some(user_id)).await.unwrap();
    assert!(tokens[0].last_used_at.is_some());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_tokens_removed_with_user(pool: PgPool) {
    let user_id = create_user(&pool, "ana@x.com").await;
    let users = PgUserRepository::new(Arc::new(pool.clone()));
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token(user_id, "auth_token", "gonehash").await.unwrap();
    users.delete_by_id(user_id).await.unwrap();

    assert!(repo.list_tokens(Some(user_id)).await.unwrap().is_empty());
}

//! Authentication service for password login and bearer tokens.

use std::sync::Arc;

use crate::domain::repositories::{CredentialRepository, TokenRepository};
use crate::error::AppError;
use crate::utils::password::verify_password;
use crate::utils::token::{generate_token, hash_token};
use serde_json::json;

/// Name stored with tokens issued by [`AuthService::login`].
pub const LOGIN_TOKEN_NAME: &str = "auth_token";

/// Service for password login and authenticating API requests via Bearer tokens.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before storage
/// and comparison. An attacker with read-only access to the database cannot verify
/// or forge tokens without the server-side secret.
///
/// Credentials are read through [`CredentialRepository`], never through the
/// user cache, so password hashes are not cached.
pub struct AuthService<T: TokenRepository + ?Sized, C: CredentialRepository + ?Sized> {
    tokens: Arc<T>,
    credentials: Arc<C>,
    signing_secret: String,
}

impl<T, C> AuthService<T, C>
where
    T: TokenRepository + ?Sized,
    C: CredentialRepository + ?Sized,
{
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `tokens` - token repository for DB operations
    /// - `credentials` - password hash lookup by email
    /// - `signing_secret` - HMAC key; must match the value used when tokens were created
    pub fn new(tokens: Arc<T>, credentials: Arc<C>, signing_secret: String) -> Self {
        Self {
            tokens,
            credentials,
            signing_secret,
        }
    }

    /// Verifies email and password and issues a fresh token.
    ///
    /// All previously issued tokens of the user are revoked first, so a user
    /// holds at most one active login token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the email is unknown or the password
    /// does not match. Both cases produce the same error.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let credentials = self.credentials.find_credentials(email).await?;

        let user_id = match credentials {
            Some(c) if verify_password(password, &c.password_hash) => c.user_id,
            _ => {
                tracing::info!("Rejected login attempt");
                return Err(AppError::bad_request(
                    "The provided credentials are incorrect.",
                    json!({ "email": ["The provided credentials are incorrect."] }),
                ));
            }
        };

        let revoked = self.tokens.revoke_all_for_user(user_id).await?;

        let token = generate_token()?;
        self.tokens
            .create_token(
                user_id,
                LOGIN_TOKEN_NAME,
                &hash_token(&self.signing_secret, &token),
            )
            .await?;

        tracing::info!(user_id, revoked, "User logged in");

        Ok(token)
    }

    /// Revokes the presented token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is not active.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        let token_hash = hash_token(&self.signing_secret, token);

        if !self.tokens.revoke_by_hash(&token_hash).await? {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ));
        }

        Ok(())
    }

    /// Authenticates a raw token and returns the owning user id.
    ///
    /// On successful authentication, updates the `last_used_at` timestamp for
    /// monitoring and audit purposes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if:
    /// - Token hash does not match any stored token
    /// - Token has been revoked
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<i64, AppError> {
        let token_hash = hash_token(&self.signing_secret, token);

        let Some(user_id) = self.tokens.find_user_id(&token_hash).await? else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ));
        };

        if let Err(e) = self.tokens.update_last_used(&token_hash).await {
            tracing::warn!(error = %e, user_id, "Failed to update token last_used_at");
        }

        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UserCredentials;
    use crate::domain::repositories::{
        AccessToken, MockCredentialRepository, MockTokenRepository,
    };
    use crate::utils::password::hash_password;
    use chrono::Utc;

    fn test_secret() -> String {
        "test-signing-secret".to_string()
    }

    fn service(
        tokens: MockTokenRepository,
        credentials: MockCredentialRepository,
    ) -> AuthService<MockTokenRepository, MockCredentialRepository> {
        AuthService::new(Arc::new(tokens), Arc::new(credentials), test_secret())
    }

    fn credentials_for(user_id: i64, password: &str) -> MockCredentialRepository {
        let hash = hash_password(password).unwrap();
        let mut mock = MockCredentialRepository::new();
        mock.expect_find_credentials()
            .returning(move |_| {
                Ok(Some(UserCredentials {
                    user_id,
                    password_hash: hash.clone(),
                }))
            });
        mock
    }

    fn stored_token(user_id: i64, token_hash: &str) -> AccessToken {
        AccessToken {
            id: 1,
            user_id,
            name: LOGIN_TOKEN_NAME.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        }
    }

    #[tokio::test]
    async fn test_login_success_rotates_tokens() {
        let mut tokens = MockTokenRepository::new();
        let mut seq = mockall::Sequence::new();

        tokens
            .expect_revoke_all_for_user()
            .withf(|user_id| *user_id == 7)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(2));
        tokens
            .expect_create_token()
            .withf(|user_id, name, hash| *user_id == 7 && name == LOGIN_TOKEN_NAME && hash.len() == 64)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|user_id, _, hash| Ok(stored_token(user_id, hash)));

        let service = service(tokens, credentials_for(7, "password"));

        let token = service.login("a@x.com", "password").await.unwrap();

        assert_eq!(token.len(), 43);
    }

    #[tokio::test]
    async fn test_login_stores_hash_not_raw_token() {
        let mut tokens = MockTokenRepository::new();
        let stored = Arc::new(std::sync::Mutex::new(String::new()));
        let stored_clone = stored.clone();

        tokens.expect_revoke_all_for_user().returning(|_| Ok(0));
        tokens
            .expect_create_token()
            .returning(move |user_id, _, hash| {
                *stored_clone.lock().unwrap() = hash.to_string();
                Ok(stored_token(user_id, hash))
            });

        let service = service(tokens, credentials_for(1, "password"));

        let token = service.login("a@x.com", "password").await.unwrap();

        let stored = stored.lock().unwrap().clone();
        assert_ne!(stored, token);
        assert_eq!(stored, hash_token(&test_secret(), &token));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut tokens = MockTokenRepository::new();
        tokens.expect_revoke_all_for_user().never();
        tokens.expect_create_token().never();

        let service = service(tokens, credentials_for(1, "password"));

        let err = service.login("a@x.com", "wrong-password").await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(
            err.to_error_info().details["email"][0],
            "The provided credentials are incorrect."
        );
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut tokens = MockTokenRepository::new();
        tokens.expect_create_token().never();

        let mut credentials = MockCredentialRepository::new();
        credentials
            .expect_find_credentials()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(tokens, credentials);

        let err = service.login("nobody@x.com", "password").await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_logout_revokes_presented_token() {
        let mut tokens = MockTokenRepository::new();
        let expected_hash = hash_token(&test_secret(), "raw-token");

        tokens
            .expect_revoke_by_hash()
            .withf(move |hash| hash == expected_hash)
            .times(1)
            .returning(|_| Ok(true));

        let service = service(tokens, MockCredentialRepository::new());

        assert!(service.logout("raw-token").await.is_ok());
    }

    #[tokio::test]
    async fn test_logout_inactive_token() {
        let mut tokens = MockTokenRepository::new();
        tokens.expect_revoke_by_hash().returning(|_| Ok(false));

        let service = service(tokens, MockCredentialRepository::new());

        let err = service.logout("raw-token").await.unwrap_err();

        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut tokens = MockTokenRepository::new();

        let token = "valid-token";
        let expected_hash = hash_token(&test_secret(), token);

        tokens
            .expect_find_user_id()
            .withf(move |hash| hash == expected_hash)
            .times(1)
            .returning(|_| Ok(Some(42)));

        tokens
            .expect_update_last_used()
            .times(1)
            .returning(|_| Ok(()));

        let service = service(tokens, MockCredentialRepository::new());

        assert_eq!(service.authenticate(token).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_authenticate_invalid_token() {
        let mut tokens = MockTokenRepository::new();

        tokens
            .expect_find_user_id()
            .times(1)
            .returning(|_| Ok(None));
        tokens.expect_update_last_used().never();

        let service = service(tokens, MockCredentialRepository::new());

        let result = service.authenticate("invalid-token").await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_tolerates_last_used_failure() {
        let mut tokens = MockTokenRepository::new();

        tokens.expect_find_user_id().returning(|_| Ok(Some(1)));
        tokens
            .expect_update_last_used()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = service(tokens, MockCredentialRepository::new());

        assert_eq!(service.authenticate("token").await.unwrap(), 1);
    }
}

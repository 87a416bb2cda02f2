//! User management service.

use crate::domain::entities::{NewUser, User, UserPatch};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password::{MIN_PASSWORD_LENGTH, hash_password};
use serde_json::json;
use std::sync::Arc;

/// Fields a caller may change on a user. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Service for managing users.
///
/// Hashes plaintext passwords before they reach the repository; everything
/// else passes through. In production `R` is the caching repository, so reads
/// here are normally served from cache.
pub struct UserService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    /// Creates a new user service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Lists all users.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn all_users(&self) -> Result<Vec<User>, AppError> {
        self.repository.list_all().await
    }

    /// Finds a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        self.repository.find_by_id(id).await
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.repository.find_by_email(email).await
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the password is too short.
    /// Returns [`AppError::Conflict`] if the email is already taken.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn create(
        &self,
        name: String,
        email: String,
        password: &str,
    ) -> Result<User, AppError> {
        validate_password(password)?;

        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(email_taken(&email));
        }

        let new_user = NewUser {
            name,
            email,
            password_hash: hash_password(password)?,
        };

        self.repository.create(new_user).await
    }

    /// Applies a partial update and returns the updated user.
    ///
    /// Returns `Ok(None)` if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a new password is too short.
    /// Returns [`AppError::Conflict`] if the new email belongs to another user.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn update(&self, id: i64, update: UpdateUser) -> Result<Option<User>, AppError> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Ok(None);
        }

        if let Some(email) = &update.email
            && let Some(owner) = self.repository.find_by_email(email).await?
            && owner.id != id
        {
            return Err(email_taken(email));
        }

        let password_hash = match update.password.as_deref() {
            Some(password) => {
                validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let patch = UserPatch {
            name: update.name,
            email: update.email,
            password_hash,
        };

        self.repository.update_by_id(id, patch).await?;

        self.repository.find_by_id(id).await
    }

    /// Deletes a user. Returns `false` if the user did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        self.repository.delete_by_id(id).await
    }
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::bad_request(
            "Validation failed",
            json!({ "password": [format!("The password must be at least {MIN_PASSWORD_LENGTH} characters.")] }),
        ));
    }
    Ok(())
}

fn email_taken(email: &str) -> AppError {
    AppError::conflict(
        "The email has already been taken.",
        json!({ "email": email }),
    )
}

//! Repository traits for user data access.

use crate::domain::entities::{NewUser, User, UserCredentials, UserPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing users.
///
/// Two implementations share this contract and are layered by decoration:
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL, the source of truth
/// - [`crate::infrastructure::cache::CachingUserRepository`] - read-through cache wrapping any
///   other `UserRepository`
///
/// "Not found" is never an error: reads return `Ok(None)` and mutations on
/// unknown ids return `Ok(false)`. Every `Err` is a store fault.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Lists every user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_all(&self) -> Result<Vec<User>, AppError>;

    /// Finds a user by id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(User))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Finds a user by exact (case-sensitive) email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Creates a user and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Partially updates a user. Only fields present in [`UserPatch`] change.
    ///
    /// Returns `Ok(false)` if no user has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the new email is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update_by_id(&self, id: i64, patch: UserPatch) -> Result<bool, AppError>;

    /// Deletes a user.
    ///
    /// Returns `Ok(false)` if no user has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError>;
}

/// Read access to stored password hashes.
///
/// Kept apart from [`UserRepository`] so credentials never pass through the cache.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Finds the credentials of the user with this exact email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>, AppError>;
}

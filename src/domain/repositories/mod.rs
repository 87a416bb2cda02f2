//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence` and
//!   `crate::infrastructure::cache`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - User CRUD, shared by the Postgres and caching layers
//! - [`CredentialRepository`] - Password hash lookup for login
//! - [`TokenRepository`] - Access token authentication

pub mod token_repository;
pub mod user_repository;

pub use token_repository::{AccessToken, TokenRepository};
pub use user_repository::{CredentialRepository, UserRepository};

#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use user_repository::{MockCredentialRepository, MockUserRepository};

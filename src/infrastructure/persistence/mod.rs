//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with bound
//! parameters.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - User storage, the source of truth behind the cache
//! - [`PgTokenRepository`] - Access token storage and validation

pub mod pg_token_repository;
pub mod pg_user_repository;

pub use pg_token_repository::PgTokenRepository;
pub use pg_user_repository::PgUserRepository;

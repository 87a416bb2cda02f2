//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic.
//!
//! # Entity Types
//!
//! - [`User`] - A registered user as seen outside the persistence layer
//! - [`UserCredentials`] - Stored password hash, used only by login
//!
//! # Design Pattern
//!
//! Entities follow the "New Type" pattern with separate structs for creation:
//! - `NewUser` - For creating new records
//! - `UserPatch` - For partial updates

pub mod user;

pub use user::{NewUser, PasswordHash, User, UserCredentials, UserPatch};

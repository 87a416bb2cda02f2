//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::user_service::UserService`] - User CRUD with password hashing
//! - [`services::auth_service::AuthService`] - Login, logout and bearer token authentication

pub mod services;

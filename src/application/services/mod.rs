//! Business logic services for the application layer.

pub mod auth_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use user_service::{UpdateUser, UserService};

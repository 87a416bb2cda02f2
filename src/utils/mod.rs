//! Helper functions shared by services and the admin CLI.
//!
//! - [`password`] - Argon2 password hashing and verification
//! - [`token`] - Access token generation and HMAC hashing

pub mod password;
pub mod token;

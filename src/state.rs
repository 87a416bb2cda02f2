//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{AuthService, UserService};
use crate::domain::repositories::{CredentialRepository, TokenRepository, UserRepository};
use crate::infrastructure::cache::CacheService;

/// User service over any [`UserRepository`]; the caching repository in production.
pub type DynUserService = UserService<dyn UserRepository>;

/// Auth service over any token and credential store.
pub type DynAuthService = AuthService<dyn TokenRepository, dyn CredentialRepository>;

#[derive(Clone)]
pub struct AppState {
    /// Pool used for health checks; repositories hold their own handle.
    pub db: Arc<PgPool>,
    pub user_service: Arc<DynUserService>,
    pub auth_service: Arc<DynAuthService>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    pub fn new(
        db: Arc<PgPool>,
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenRepository>,
        credentials: Arc<dyn CredentialRepository>,
        cache: Arc<dyn CacheService>,
        token_signing_secret: String,
    ) -> Self {
        Self {
            db,
            user_service: Arc::new(UserService::new(users)),
            auth_service: Arc::new(AuthService::new(
                tokens,
                credentials,
                token_signing_secret,
            )),
            cache,
        }
    }
}

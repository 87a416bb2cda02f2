//! API route configuration.

use crate::api::handlers::{
    create_user_handler, delete_user_handler, login_handler, logout_handler, register_handler,
    show_user_handler, update_user_handler, user_list_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Registration and login. No authentication.
///
/// # Endpoints
///
/// - `POST /register` - Create an account
/// - `POST /login`    - Exchange credentials for a bearer token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
}

/// Routes protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /logout`      - Revoke the current token
/// - `GET    /users`       - List users
/// - `POST   /users`       - Create a user
/// - `GET    /users/{id}`  - Show a user
/// - `PUT    /users/{id}`  - Update own account
/// - `PATCH  /users/{id}`  - Update own account
/// - `DELETE /users/{id}`  - Delete own account
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout_handler))
        .route("/users", get(user_list_handler).post(create_user_handler))
        .route(
            "/users/{id}",
            get(show_user_handler)
                .put(update_user_handler)
                .patch(update_user_handler)
                .delete(delete_user_handler),
        )
}

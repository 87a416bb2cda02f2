//! Handlers for registration, login and logout.

use axum::{Json, extract::State, http::StatusCode};
use axum_auth::AuthBearer;
use validator::Validate;

use crate::api::dto::auth::{LoginRequest, LoginResponse, MessageResponse};
use crate::api::dto::user::CreateUserRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new account.
///
/// # Endpoint
///
/// `POST /api/v1/register`
///
/// No token is issued; the client logs in afterwards.
///
/// # Errors
///
/// Returns 400 if validation fails.
/// Returns 409 if the email is already taken.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    payload.validate()?;

    let user = state
        .user_service
        .create(payload.name, payload.email, &payload.password)
        .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Registration successful. Please log in.",
        )),
    ))
}

/// Exchanges email and password for a bearer token.
///
/// # Endpoint
///
/// `POST /api/v1/login`
///
/// Any tokens previously issued to the user are revoked.
///
/// # Response
///
/// ```json
/// { "message": "Login successful", "token": "..." }
/// ```
///
/// # Errors
///
/// Returns 400 with an `email` field error if the credentials are incorrect.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let token = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}

/// Revokes the token used for this request.
///
/// # Endpoint
///
/// `POST /api/v1/logout`
pub async fn logout_handler(
    State(state): State<AppState>,
    AuthBearer(token): AuthBearer,
) -> Result<Json<MessageResponse>, AppError> {
    state.auth_service.logout(&token).await?;

    Ok(Json(MessageResponse::new("Logout successful")))
}

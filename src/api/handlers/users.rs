//! Handlers for user management endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::user::{CreateUserRequest, DataResponse, UpdateUserRequest, UserResource};
use crate::api::middleware::auth::CurrentUser;
use crate::domain::entities::User;
use crate::domain::policy::{UserAction, UserPolicy};
use crate::error::AppError;
use crate::state::AppState;

fn user_not_found(id: i64) -> AppError {
    AppError::not_found("User not found", json!({ "id": id }))
}

/// Loads the target user or fails with 404.
async fn find_user(state: &AppState, id: i64) -> Result<User, AppError> {
    state
        .user_service
        .user_by_id(id)
        .await?
        .ok_or_else(|| user_not_found(id))
}

/// Lists all users.
///
/// # Endpoint
///
/// `GET /api/v1/users`
pub async fn user_list_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<DataResponse<Vec<UserResource>>>, AppError> {
    UserPolicy::authorize(current.id, UserAction::ViewAny, None)?;

    let users = state.user_service.all_users().await?;

    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResource::from).collect(),
    }))
}

/// Creates a user on behalf of an authenticated caller.
///
/// # Endpoint
///
/// `POST /api/v1/users`
///
/// # Errors
///
/// Returns 400 if validation fails.
/// Returns 409 if the email is already taken.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<DataResponse<UserResource>>), AppError> {
    UserPolicy::authorize(current.id, UserAction::Create, None)?;
    payload.validate()?;

    let user = state
        .user_service
        .create(payload.name, payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: user.into(),
        }),
    ))
}

/// Returns one user.
///
/// # Endpoint
///
/// `GET /api/v1/users/{id}`
///
/// # Errors
///
/// Returns 404 if the user does not exist.
pub async fn show_user_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<DataResponse<UserResource>>, AppError> {
    let user = find_user(&state, id).await?;

    UserPolicy::authorize(current.id, UserAction::View, Some(&user))?;

    Ok(Json(DataResponse { data: user.into() }))
}

/// Partially updates a user. Only the user itself may do this.
///
/// # Endpoint
///
/// `PUT /api/v1/users/{id}` or `PATCH /api/v1/users/{id}`
///
/// # Errors
///
/// Returns 400 if validation fails.
/// Returns 403 if the caller is not the target user.
/// Returns 404 if the user does not exist.
/// Returns 409 if the new email belongs to another user.
pub async fn update_user_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<DataResponse<UserResource>>, AppError> {
    let user = find_user(&state, id).await?;

    UserPolicy::authorize(current.id, UserAction::Update, Some(&user))?;
    payload.validate()?;

    let updated = state
        .user_service
        .update(id, payload.into())
        .await?
        .ok_or_else(|| user_not_found(id))?;

    Ok(Json(DataResponse {
        data: updated.into(),
    }))
}

/// Deletes a user. Only the user itself may do this.
///
/// # Endpoint
///
/// `DELETE /api/v1/users/{id}`
///
/// The user's access tokens are removed with it.
///
/// # Errors
///
/// Returns 403 if the caller is not the target user.
/// Returns 404 if the user does not exist.
pub async fn delete_user_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<StatusCode, AppError> {
    let user = find_user(&state, id).await?;

    UserPolicy::authorize(current.id, UserAction::Delete, Some(&user))?;

    if !state.user_service.delete(id).await? {
        return Err(user_not_found(id));
    }

    tracing::info!(user_id = id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

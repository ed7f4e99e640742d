use crate::api::{CreateUserRequest, ListUsersResponse, UpdateUserRequest, UserResponse};
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{validate_create_user, validate_update_user};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bulletin::User;
use shared::Error;
use tracing::info;

/// POST /users - Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_create_user(&req)?;

    let user = state
        .users
        .create(User::new(req.name.trim().to_string(), req.email.trim().to_string()))
        .await?;

    info!("CREATE_USER: id={}", user.id);
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /users - List all users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<ListUsersResponse>, ApiError> {
    let users = state.users.list_all().await?;
    Ok(Json(ListUsersResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.find_by_id(&id).await?.ok_or(Error::NotFound)?;
    Ok(Json(user.into()))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    validate_update_user(&req)?;

    let mut user = state.users.find_by_id(&id).await?.ok_or(Error::NotFound)?;
    user.apply(
        req.name.map(|n| n.trim().to_string()),
        req.email.map(|e| e.trim().to_string()),
    );
    let user = state.users.update(user).await?;

    info!("UPDATE_USER: id={}", user.id);
    Ok(Json(user.into()))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.users.delete(&id).await?;
    info!("DELETE_USER: id={}", id);
    Ok(StatusCode::NO_CONTENT)
}

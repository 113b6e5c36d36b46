//! User Management Endpoints
//! Mission: Admin-gated account administration with self-service updates

use crate::api::{error::ApiError, AppState, Message};
use crate::auth::{password::hash_password, CurrentUser, Policy};
use crate::models::{UserPublic, UserRole};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub username: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

/// Create user - POST /users/ (admin only)
pub async fn create_user(
    State(state): State<AppState>,
    Extension(CurrentUser(current)): Extension<CurrentUser>,
    Json(payload): Json<UserPayload>,
) -> Result<(StatusCode, Json<UserPublic>), ApiError> {
    Policy::AdminOnly.authorize(&current, "Not allowed")?;

    let password_hash = hash_password(&payload.password)?;
    let user = state
        .store
        .create_user(&payload.username, &password_hash, payload.role)?
        .ok_or(ApiError::Conflict("Username already used"))?;

    info!("✅ Created user: {} ({})", user.username, user.role.as_str());

    Ok((StatusCode::CREATED, Json(UserPublic::from_user(&user))))
}

/// List users - GET /users/ (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    Extension(CurrentUser(current)): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<UserPublic>>, ApiError> {
    Policy::AdminOnly.authorize(&current, "Not allowed")?;

    let users = state
        .store
        .list_users(query.skip, query.limit.unwrap_or(100))?;

    Ok(Json(users.iter().map(UserPublic::from_user).collect()))
}

/// Update user - PUT /users/:id (self or admin)
pub async fn update_user(
    State(state): State<AppState>,
    Extension(CurrentUser(current)): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<UserPublic>, ApiError> {
    Policy::SelfOrAdmin { owner_id: user_id }.authorize(&current, "Not allowed")?;

    // Only an ADMIN caller may change roles; a WRITER's role field is
    // discarded, including on their own record.
    let role = current.role.is_admin().then_some(payload.role);

    let password_hash = hash_password(&payload.password)?;
    let user = state
        .store
        .update_user(user_id, &payload.username, &password_hash, role)?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(UserPublic::from_user(&user)))
}

/// Delete user - DELETE /users/:id (self or admin; articles go with the user)
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(CurrentUser(current)): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
) -> Result<Json<Message>, ApiError> {
    Policy::SelfOrAdmin { owner_id: user_id }.authorize(&current, "Not allowed")?;

    if !state.store.delete_user(user_id)? {
        return Err(ApiError::NotFound("User not found"));
    }

    info!("🗑️  Deleted user {}", user_id);

    Ok(Json(Message {
        detail: "User deleted",
    }))
}

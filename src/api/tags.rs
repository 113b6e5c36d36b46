//! Tag Endpoints
//! Mission: Maintain the flat label set

// Tags carry no enforced relation to articles; `Article.tags` is opaque
// free text and stays that way.

use crate::api::{error::ApiError, AppState};
use crate::models::Tag;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TagPayload {
    pub title: String,
}

/// Create tag - POST /tags/
pub async fn create_tag(
    State(state): State<AppState>,
    Json(payload): Json<TagPayload>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    let tag = state
        .store
        .create_tag(&payload.title)?
        .ok_or(ApiError::Conflict("Tag already exists"))?;

    Ok((StatusCode::CREATED, Json(tag)))
}

/// List tags - GET /tags/
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(state.store.list_tags()?))
}

/// Update tag - PUT /tags/:id
pub async fn update_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<i64>,
    Json(payload): Json<TagPayload>,
) -> Result<Json<Tag>, ApiError> {
    let tag = state
        .store
        .update_tag(tag_id, &payload.title)?
        .ok_or(ApiError::NotFound("Tag not found"))?;

    Ok(Json(tag))
}

/// Delete tag - DELETE /tags/:id (answers with the removed tag)
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<i64>,
) -> Result<Json<Tag>, ApiError> {
    let tag = state
        .store
        .delete_tag(tag_id)?
        .ok_or(ApiError::NotFound("Tag not found"))?;

    Ok(Json(tag))
}

//! Article Endpoints
//! Mission: Publishing with open collaboration and admin-gated removal

use crate::api::{error::ApiError, AppState, Message};
use crate::auth::{CurrentUser, Policy};
use crate::db::{ArticleFilter, ArticlePatch};
use crate::models::Article;
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDateTime;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ArticlePayload {
    pub title: String,
    pub content: String,
    pub tags: String,
    pub date: NaiveDateTime,
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Deserialize)]
pub struct ArticleUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
    pub date: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct ArticleQuery {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
    pub user_id: Option<i64>,
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

/// Create article - POST /articles/ (attributed to the caller)
pub async fn create_article(
    State(state): State<AppState>,
    Extension(CurrentUser(current)): Extension<CurrentUser>,
    Json(payload): Json<ArticlePayload>,
) -> Result<Json<Article>, ApiError> {
    let article = state.store.create_article(
        &payload.title,
        &payload.content,
        &payload.tags,
        payload.date,
        current.id,
    )?;

    Ok(Json(article))
}

/// List articles - GET /articles/ (filters AND-combined, offset/limit paging)
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ArticleQuery>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let filter = ArticleFilter {
        title: query.title,
        content: query.content,
        tags: query.tags,
        user_id: query.user_id,
        skip: query.skip,
        limit: query.limit.unwrap_or(100),
    };

    Ok(Json(state.store.list_articles(&filter)?))
}

/// Update article - PUT /articles/:id
///
/// Any authenticated user may edit any article; there is no ownership check
/// on updates.
pub async fn update_article(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
    Json(payload): Json<ArticleUpdate>,
) -> Result<Json<Article>, ApiError> {
    let patch = ArticlePatch {
        title: payload.title,
        content: payload.content,
        tags: payload.tags,
        date: payload.date,
    };

    let article = state
        .store
        .update_article(article_id, patch)?
        .ok_or(ApiError::NotFound("Article not found"))?;

    Ok(Json(article))
}

/// Delete article - DELETE /articles/:id (ADMIN only, ownership irrelevant)
pub async fn delete_article(
    State(state): State<AppState>,
    Extension(CurrentUser(current)): Extension<CurrentUser>,
    Path(article_id): Path<i64>,
) -> Result<Json<Message>, ApiError> {
    Policy::AdminOnly.authorize(&current, "Not enough permissions")?;

    if !state.store.delete_article(article_id)? {
        return Err(ApiError::NotFound("Article not found"));
    }

    Ok(Json(Message {
        detail: "Article deleted",
    }))
}

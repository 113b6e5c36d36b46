//! HTTP surface: shared state, router assembly, and per-resource handlers.

pub mod articles;
pub mod auth;
pub mod error;
pub mod tags;
pub mod users;

use crate::auth::{auth_middleware, JwtHandler};
use crate::db::Database;
use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Database>,
    pub jwt: Arc<JwtHandler>,
}

/// Plain `{"detail": ...}` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct Message {
    pub detail: &'static str,
}

/// Create the API router.
///
/// Everything except the liveness probe and the login endpoint sits behind
/// the bearer-token middleware.
pub fn create_router(store: Arc<Database>, jwt: Arc<JwtHandler>) -> Router {
    let state = AppState { store, jwt };

    let protected = Router::new()
        .route("/refresh_token", post(auth::refresh_access_token))
        .route("/users/", post(users::create_user).get(users::list_users))
        .route(
            "/users/:id",
            put(users::update_user).delete(users::delete_user),
        )
        .route(
            "/articles/",
            post(articles::create_article).get(articles::list_articles),
        )
        .route(
            "/articles/:id",
            put(articles::update_article).delete(articles::delete_article),
        )
        .route("/tags/", post(tags::create_tag).get(tags::list_tags))
        .route("/tags/:id", put(tags::update_tag).delete(tags::delete_tag))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let public = Router::new()
        .route("/", get(root))
        .route("/token", post(auth::login_for_access_token));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(middleware::from_fn(crate::middleware::request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness probe.
async fn root() -> Json<Value> {
    Json(json!({ "message": "ok" }))
}

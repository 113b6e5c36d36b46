//! Token Endpoints
//! Mission: Exchange credentials for bearer tokens, and refresh them

use crate::api::{error::ApiError, AppState};
use crate::auth::{password::verify_password, CurrentUser};
use axum::{extract::State, Extension, Form, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Login form body (OAuth2 password-flow shape).
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

/// Login endpoint - POST /token
pub async fn login_for_access_token(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = state
        .store
        .get_user_by_username(&form.username)?
        .ok_or(ApiError::BadCredentials)?;

    if !verify_password(&form.password, &user.password_hash) {
        warn!("❌ Failed login attempt: {}", form.username);
        return Err(ApiError::BadCredentials);
    }

    let token = state.jwt.issue(&user.username)?;
    info!("✅ Login successful: {} ({})", user.username, user.role.as_str());

    Ok(Json(TokenResponse::bearer(token)))
}

/// Refresh endpoint - POST /refresh_token
///
/// The middleware has already resolved the token to a live user, so a token
/// whose subject was deleted cannot be refreshed.
pub async fn refresh_access_token(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.jwt.issue(&user.username)?;
    Ok(Json(TokenResponse::bearer(token)))
}

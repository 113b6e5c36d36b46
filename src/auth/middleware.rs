//! Authentication Middleware
//! Mission: Resolve bearer tokens to full user identities

use crate::api::{error::ApiError, AppState};
use crate::models::User;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Authenticated identity, inserted into request extensions once the token
/// has been validated and its subject loaded from the store.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Middleware guarding every protected route.
///
/// A missing header, an invalid or expired token, and a subject deleted
/// after issuance all produce the same 401; callers learn nothing about
/// which check failed.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|t| t.to_string())
        .ok_or(ApiError::Unauthorized)?;

    let claims = state
        .jwt
        .validate(&token)
        .map_err(|_| ApiError::Unauthorized)?;

    let user = state
        .store
        .get_user_by_username(&claims.sub)?
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

//! Authentication API endpoints
//!
//! Login issues an access/refresh token pair; refresh trades a refresh
//! token for a new access token.

use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::auth::{TokenPair, TokenType};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login/", post(login))
        .route("/token/refresh/", post(refresh))
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Refresh request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Refresh response
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Login with username and password
///
/// POST /api/login/
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let user = state
        .user_service
        .authenticate(&request.username, &request.password)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to log in."))?
        .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;

    let pair = state
        .jwt_service
        .generate_pair(&user)
        .map_err(|e| ApiError::from_domain(e, "Failed to log in."))?;

    info!(user_id = user.id(), username = %user.username(), "User logged in");
    Ok(Json(pair))
}

/// Exchange a refresh token for a new access token
///
/// POST /api/token/refresh/
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let claims = state
        .jwt_service
        .validate(&request.refresh, TokenType::Refresh)
        .map_err(|_| ApiError::unauthorized("Token is invalid or expired"))?;

    let user = state
        .user_service
        .get(claims.user_id()?)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to refresh token."))?
        .filter(|user| user.is_active())
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    let access = state
        .jwt_service
        .generate(&user, TokenType::Access)
        .map_err(|e| ApiError::from_domain(e, "Failed to refresh token."))?;

    Ok(Json(RefreshResponse { access }))
}

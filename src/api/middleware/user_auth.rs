//! User authentication extractor using JWT access tokens

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;
use crate::infrastructure::auth::TokenType;

/// Extractor that requires a valid access token
///
/// Extracts the JWT token from:
/// - Authorization header: `Bearer <jwt_token>`
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_token(&parts.headers)?;

        debug!("Validating JWT token");

        let claims = state
            .jwt_service
            .validate(&token, TokenType::Access)
            .map_err(|e| {
                debug!(error = %e, "Rejected access token");
                ApiError::unauthorized("Given token not valid for any token type")
            })?;

        let user_id = claims.user_id().map_err(ApiError::from)?;

        let user = state
            .user_service
            .get(user_id)
            .await
            .map_err(|e| ApiError::from_domain(e, "Failed to authenticate user."))?
            .ok_or_else(|| ApiError::unauthorized("User not found"))?;

        if !user.is_active() {
            warn!(user_id = user.id(), "Inactive user presented a valid token");
            return Err(ApiError::unauthorized("User is inactive"));
        }

        Ok(RequireUser(user))
    }
}

/// Extract JWT token from Authorization header
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::unauthorized("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }
    }

    Err(ApiError::unauthorized(
        "Authentication credentials were not provided.",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Bearer eyJhbGciOiJIUzI1NiJ9.test".parse().unwrap(),
        );

        let result = extract_jwt_token(&headers);
        assert_eq!(result.unwrap(), "eyJhbGciOiJIUzI1NiJ9.test");
    }

    #[test]
    fn test_missing_token() {
        let headers = HeaderMap::new();

        let err = extract_jwt_token(&headers).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_auth_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Basic dXNlcjpwYXNz".parse().unwrap(),
        );

        assert!(extract_jwt_token(&headers).is_err());
    }

    #[test]
    fn test_empty_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer    ".parse().unwrap());

        assert!(extract_jwt_token(&headers).is_err());
    }

    #[test]
    fn test_trimmed_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Bearer   token-with-spaces   ".parse().unwrap(),
        );

        assert_eq!(extract_jwt_token(&headers).unwrap(), "token-with-spaces");
    }
}

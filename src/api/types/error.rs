//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::validation::FieldErrors;
use crate::domain::DomainError;

/// Error body: `{"error": "...", "details": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: message.into(),
                details: None,
            },
        }
    }

    /// Attach per-field validation messages
    pub fn with_details(mut self, details: FieldErrors) -> Self {
        self.response.details = Some(details);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Maps a domain error, hiding backend failures behind `generic`
    ///
    /// The original error is logged so the operator still sees it.
    pub fn from_domain(err: DomainError, generic: &str) -> Self {
        if err.is_unexpected() {
            error!(error = %err, "{}", generic);
            return Self::internal(generic);
        }

        Self::from(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message, details } => {
                let api_error = Self::bad_request(message);
                match details {
                    Some(details) => api_error.with_details(details),
                    None => api_error,
                }
            }
            DomainError::InvalidRequest { message } => Self::bad_request(message),
            DomainError::Conflict { message } => Self::bad_request(message),
            DomainError::Unauthorized { message } => Self::unauthorized(message),
            DomainError::Configuration { message }
            | DomainError::Internal { message }
            | DomainError::Storage { message }
            | DomainError::Cache { message } => Self::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let error = ApiError::bad_request("Department already exists.");
        let json = serde_json::to_value(&error.response).unwrap();

        assert_eq!(json, serde_json::json!({"error": "Department already exists."}));
    }

    #[test]
    fn test_validation_details() {
        let mut details = FieldErrors::new();
        details.add("employee_salary", "min value is 100");

        let error = ApiError::from(DomainError::invalid_payload(details));
        let json = serde_json::to_value(&error.response).unwrap();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json,
            serde_json::json!({
                "error": "Validation error",
                "details": {"employee_salary": ["min value is 100"]}
            })
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(DomainError::not_found("Employee not found.")).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(DomainError::conflict("dup")).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(DomainError::unauthorized("expired")).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(DomainError::invalid_request("Invalid limit or offset.")).status,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_from_domain_hides_backend_errors() {
        let error = ApiError::from_domain(
            DomainError::storage("relation \"departments\" does not exist"),
            "Failed to create department.",
        );

        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.response.error, "Failed to create department.");
    }

    #[test]
    fn test_from_domain_keeps_client_errors() {
        let error = ApiError::from_domain(
            DomainError::not_found("Department not found."),
            "Failed to delete department.",
        );

        assert_eq!(error.status, StatusCode::NOT_FOUND);
        assert_eq!(error.response.error, "Department not found.");
    }
}

//! Custom JSON extractor that returns errors as JSON

use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Wrapper around `axum::Json` whose rejections use the API error body
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Consume the extractor and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => {
                let status = match &rejection {
                    axum::extract::rejection::JsonRejection::MissingJsonContentType(_) => {
                        StatusCode::UNSUPPORTED_MEDIA_TYPE
                    }
                    _ => StatusCode::BAD_REQUEST,
                };

                Err(ApiError::new(status, format_rejection_message(&rejection)))
            }
        }
    }
}

/// Format the rejection message to be more user-friendly
fn format_rejection_message(rejection: &axum::extract::rejection::JsonRejection) -> String {
    use axum::extract::rejection::JsonRejection::*;

    match rejection {
        JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
        JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err.body_text()),
        MissingJsonContentType(_) => {
            "Missing Content-Type header. Expected 'application/json'.".to_string()
        }
        BytesRejection(err) => format!("Failed to read request body: {}", err.body_text()),
        _ => "Invalid JSON request".to_string(),
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Credentials {
        username: String,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_extracts_value() {
        let request = json_request(r#"{"username":"admin"}"#);
        let Json(credentials) = Json::<Credentials>::from_request(request, &()).await.unwrap();

        assert_eq!(credentials.username, "admin");
    }

    #[tokio::test]
    async fn test_syntax_error_is_bad_request() {
        let error = Json::<serde_json::Value>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert!(error.response.error.starts_with("Invalid JSON syntax"));
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let error = Json::<Credentials>::from_request(json_request("{}"), &())
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert!(error.response.error.starts_with("Invalid JSON data"));
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("{}"))
            .unwrap();

        let error = Json::<serde_json::Value>::from_request(request, &())
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_json_into_inner() {
        let json = Json(42);
        assert_eq!(json.into_inner(), 42);
    }
}

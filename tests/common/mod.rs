//! Shared helpers for HTTP integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use workforce_api::api::{create_router, AppState};
use workforce_api::infrastructure::user::CreateUserRequest;
use workforce_api::{create_app_state_with_config, AppConfig};

pub const USERNAME: &str = "tester";
pub const PASSWORD: &str = "tester-password";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub access: String,
    pub refresh: String,
}

impl TestApp {
    /// In-memory app with one logged-in user
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("integration-test-secret".to_string());

        let state = create_app_state_with_config(&config).await.unwrap();
        state
            .user_service
            .create(CreateUserRequest::new(USERNAME, PASSWORD))
            .await
            .unwrap();

        let router = create_router(state.clone());
        let mut app = Self {
            router,
            state,
            access: String::new(),
            refresh: String::new(),
        };

        let (status, tokens) = app
            .send(
                Method::POST,
                "/api/login/",
                Some(json!({"username": USERNAME, "password": PASSWORD})),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        app.access = tokens["access"].as_str().unwrap().to_string();
        app.refresh = tokens["refresh"].as_str().unwrap().to_string();
        app
    }

    /// Sends a request, optionally with a JSON body and bearer token
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();

        (status, body_to_json(response.into_body()).await)
    }

    /// Sends a request as the logged-in user
    pub async fn authed(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let access = self.access.clone();
        self.send(method, uri, body, Some(&access)).await
    }

    pub async fn create_department(&self, name: &str) -> StatusCode {
        let (status, _) = self
            .authed(
                Method::POST,
                "/departments/create/",
                Some(json!({"department_name": name})),
            )
            .await;
        status
    }

    pub async fn create_employee(&self, name: &str, department: &str, salary: i64) -> StatusCode {
        let (status, _) = self
            .authed(
                Method::POST,
                "/employees/create/",
                Some(json!({
                    "employee_name": name,
                    "department_name": department,
                    "employee_salary": salary
                })),
            )
            .await;
        status
    }
}

pub async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    if bytes.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice(&bytes).unwrap()
}

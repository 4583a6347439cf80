use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::auth;
use super::directory;
use super::health;
use super::middleware::{logging_middleware, security_headers_middleware};
use super::state::AppState;
use super::types::{Json, MessageResponse};

/// GET /
pub async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the API!"))
}

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(welcome))
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Token endpoints (no auth required)
        .nest("/api", auth::create_auth_router())
        // Directory endpoints
        .merge(directory::create_directory_router())
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

//! Department and employee directory endpoints
//!
//! Every route requires a valid access token.

pub mod departments;
pub mod employees;

use axum::Router;

use crate::api::state::AppState;

/// Create the directory router
pub fn create_directory_router() -> Router<AppState> {
    Router::new()
        .merge(departments::create_departments_router())
        .merge(employees::create_employees_router())
}

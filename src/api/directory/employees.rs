//! Employee endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::Value;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, MessageResponse, Page};
use crate::domain::employee::EmployeeRecord;
use crate::domain::store::EmployeeOrder;
use crate::domain::Pagination;

pub fn create_employees_router() -> Router<AppState> {
    Router::new()
        .route("/employees/", get(list_employees))
        .route("/employees/ordered_by_salary/", get(list_employees_by_salary))
        .route("/employees/create/", post(create_employee))
        .route("/employees/update/{name}/", put(update_employee))
        .route("/employees/delete/{name}/", delete(delete_employee))
}

async fn list(
    state: &AppState,
    page: Pagination,
    order: EmployeeOrder,
) -> Result<Json<Vec<EmployeeRecord>>, ApiError> {
    let employees = state
        .employees
        .list(page, order)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to retrieve employees."))?;

    Ok(Json(employees))
}

/// GET /employees/?limit=&offset=
pub async fn list_employees(
    _user: RequireUser,
    State(state): State<AppState>,
    Page(page): Page,
) -> Result<Json<Vec<EmployeeRecord>>, ApiError> {
    list(&state, page, EmployeeOrder::Id).await
}

/// GET /employees/ordered_by_salary/?limit=&offset=
pub async fn list_employees_by_salary(
    _user: RequireUser,
    State(state): State<AppState>,
    Page(page): Page,
) -> Result<Json<Vec<EmployeeRecord>>, ApiError> {
    list(&state, page, EmployeeOrder::SalaryDesc).await
}

/// POST /employees/create/
pub async fn create_employee(
    _user: RequireUser,
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state
        .employees
        .create(&payload)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to create employee."))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Employee created successfully.")),
    ))
}

/// PUT /employees/update/{name}/
pub async fn update_employee(
    _user: RequireUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .employees
        .update(&name, &payload)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to update employee."))?;

    Ok(Json(MessageResponse::new("Employee updated successfully.")))
}

/// DELETE /employees/delete/{name}/
pub async fn delete_employee(
    _user: RequireUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .employees
        .delete(&name)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to delete employee."))?;

    Ok(Json(MessageResponse::new("Employee deleted successfully.")))
}

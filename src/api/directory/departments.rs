//! Department endpoints

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
use crate::domain::department::DepartmentView;
use crate::infrastructure::services::DEPARTMENT_NOT_FOUND;

pub fn create_departments_router() -> Router<AppState> {
    Router::new()
        .route("/departments/", get(list_departments))
        .route("/departments/create/", post(create_department))
        .route("/departments/update/{id}/", put(update_department))
        .route("/departments/delete/{id}/", delete(delete_department))
}

/// Ids that are not integers address no department
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found(DEPARTMENT_NOT_FOUND))
}

/// GET /departments/?limit=&offset=
pub async fn list_departments(
    _user: RequireUser,
    State(state): State<AppState>,
    Page(page): Page,
) -> Result<Json<Vec<DepartmentView>>, ApiError> {
    let departments = state
        .departments
        .list(page)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to retrieve departments."))?;

    Ok(Json(departments))
}

/// POST /departments/create/
pub async fn create_department(
    _user: RequireUser,
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state
        .departments
        .create(&payload)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to create department."))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Department created successfully.")),
    ))
}

/// PUT /departments/update/{id}/
pub async fn update_department(
    _user: RequireUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;

    state
        .departments
        .update(id, &payload)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to update department."))?;

    Ok(Json(MessageResponse::new("Department updated successfully.")))
}

/// DELETE /departments/delete/{id}/
pub async fn delete_department(
    _user: RequireUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;

    state
        .departments
        .delete(id)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to delete department."))?;

    Ok(Json(MessageResponse::new("Department deleted successfully.")))
}

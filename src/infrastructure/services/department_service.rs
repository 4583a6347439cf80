//! Department service - business logic for department management

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::domain::cache::{CacheKeys, CacheNamespace};
use crate::domain::department::{Department, DepartmentPayload, DepartmentView};
use crate::domain::store::Store;
use crate::domain::validation::{department_schema, ValidationMode};
use crate::domain::{DomainError, Pagination};

use super::list_cache::ListCache;

pub const DEPARTMENT_EXISTS: &str = "Department already exists.";
pub const DEPARTMENT_NAME_TAKEN: &str = "Another department with the same name already exists.";
pub const DEPARTMENT_NOT_FOUND: &str = "Department not found.";
pub const DEPARTMENT_IN_USE: &str = "Department still has employees.";

/// Validates a department body and reads it
fn parse_department(payload: &Value) -> Result<DepartmentPayload, DomainError> {
    department_schema()
        .validate(payload, ValidationMode::Strict)
        .map_err(DomainError::invalid_payload)?;

    serde_json::from_value(payload.clone())
        .map_err(|e| DomainError::invalid_request(format!("Invalid department payload: {}", e)))
}

/// Department service
#[derive(Debug, Clone)]
pub struct DepartmentService {
    store: Arc<dyn Store>,
    cache: ListCache,
}

impl DepartmentService {
    pub fn new(store: Arc<dyn Store>, cache: ListCache) -> Self {
        Self { store, cache }
    }

    /// One page of departments, ascending by id
    pub async fn list(&self, page: Pagination) -> Result<Vec<DepartmentView>, DomainError> {
        let key = CacheKeys::departments(&page);

        if let Some(cached) = self.cache.get::<Vec<DepartmentView>>(&key).await {
            info!(key = %key, "Fetching department data from cache");
            return Ok(cached);
        }

        info!(key = %key, "Fetching department data from database");
        let views: Vec<DepartmentView> = {
            let mut session = self.store.session().await?;
            session
                .list_departments(&page)
                .await?
                .iter()
                .map(DepartmentView::from)
                .collect()
        };

        // session released before the cache round-trip
        self.cache.put(CacheNamespace::Departments, &key, &views).await;
        Ok(views)
    }

    /// Create a new department
    pub async fn create(&self, payload: &Value) -> Result<Department, DomainError> {
        let request = parse_department(payload)?;

        let mut session = self.store.session().await?;
        if session
            .find_department_by_name(&request.department_name)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(DEPARTMENT_EXISTS));
        }

        let department = session
            .insert_department(&request.department_name)
            .await
            .map_err(|e| match e {
                DomainError::Conflict { .. } => DomainError::conflict(DEPARTMENT_EXISTS),
                other => other,
            })?;
        session.commit().await?;

        self.cache.invalidate(CacheNamespace::Departments).await;

        info!(department_id = department.id(), name = %department.name(), "Department created");
        Ok(department)
    }

    /// Rename a department
    pub async fn update(&self, id: i64, payload: &Value) -> Result<Department, DomainError> {
        let request = parse_department(payload)?;

        let mut session = self.store.session().await?;
        let mut department = session
            .get_department(id)
            .await?
            .ok_or_else(|| DomainError::not_found(DEPARTMENT_NOT_FOUND))?;

        if let Some(existing) = session
            .find_department_by_name(&request.department_name)
            .await?
        {
            if existing.id() != id {
                return Err(DomainError::conflict(DEPARTMENT_NAME_TAKEN));
            }
        }

        department.rename(request.department_name);
        session
            .update_department(&department)
            .await
            .map_err(|e| match e {
                DomainError::Conflict { .. } => DomainError::conflict(DEPARTMENT_NAME_TAKEN),
                other => other,
            })?;
        session.commit().await?;

        self.cache.invalidate_key(&CacheKeys::department(id)).await;
        self.cache.invalidate(CacheNamespace::Departments).await;

        info!(department_id = id, name = %department.name(), "Department updated");
        Ok(department)
    }

    /// Delete a department that no employee references
    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let mut session = self.store.session().await?;
        if session.get_department(id).await?.is_none() {
            return Err(DomainError::not_found(DEPARTMENT_NOT_FOUND));
        }

        if session.count_employees_in(id).await? > 0 {
            return Err(DomainError::conflict(DEPARTMENT_IN_USE));
        }

        // a concurrent insert can still add a reference after the count
        let deleted = session.delete_department(id).await.map_err(|e| match e {
            DomainError::Conflict { .. } => DomainError::conflict(DEPARTMENT_IN_USE),
            other => other,
        })?;
        if !deleted {
            return Err(DomainError::not_found(DEPARTMENT_NOT_FOUND));
        }
        session.commit().await?;

        self.cache.invalidate(CacheNamespace::Departments).await;

        info!(department_id = id, "Department deleted");
        Ok(())
    }
}

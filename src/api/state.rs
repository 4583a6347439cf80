//! Application state for shared services

use std::sync::Arc;

use crate::domain::cache::Cache;
use crate::domain::store::Store;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::services::{DepartmentService, EmployeeService, ListCache};
use crate::infrastructure::user::UserService;

/// Application state shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub departments: DepartmentService,
    pub employees: EmployeeService,
    pub user_service: UserService,
    pub jwt_service: Arc<dyn JwtGenerator>,
    store: Arc<dyn Store>,
    cache: Arc<dyn Cache>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        list_cache: ListCache,
        user_service: UserService,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            departments: DepartmentService::new(store.clone(), list_cache.clone()),
            employees: EmployeeService::new(store.clone(), list_cache.clone()),
            user_service,
            jwt_service,
            cache: list_cache.backend().clone(),
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }
}

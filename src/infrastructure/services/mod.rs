//! Infrastructure services

mod department_service;
mod employee_service;
mod list_cache;

pub use department_service::{
    DepartmentService, DEPARTMENT_EXISTS, DEPARTMENT_IN_USE, DEPARTMENT_NAME_TAKEN,
    DEPARTMENT_NOT_FOUND,
};
pub use employee_service::{EmployeeService, EMPLOYEE_NOT_FOUND};
pub use list_cache::{ListCache, ListCacheConfig};

//! Employee service - business logic for employee management

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::domain::cache::{CacheKeys, CacheNamespace};
use crate::domain::employee::{
    Employee, EmployeeChanges, EmployeePayload, EmployeeRecord, NewEmployee,
};
use crate::domain::store::{EmployeeOrder, Store};
use crate::domain::validation::{employee_schema, ValidationMode};
use crate::domain::{DomainError, Pagination};

use super::list_cache::ListCache;

pub const EMPLOYEE_NOT_FOUND: &str = "Employee not found.";

/// Employee service
#[derive(Debug, Clone)]
pub struct EmployeeService {
    store: Arc<dyn Store>,
    cache: ListCache,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn Store>, cache: ListCache) -> Self {
        Self { store, cache }
    }

    /// One page of employees in the given order
    pub async fn list(
        &self,
        page: Pagination,
        order: EmployeeOrder,
    ) -> Result<Vec<EmployeeRecord>, DomainError> {
        let key = match order {
            EmployeeOrder::Id => CacheKeys::employees(&page),
            EmployeeOrder::SalaryDesc => CacheKeys::employees_by_salary(&page),
        };

        if let Some(cached) = self.cache.get::<Vec<EmployeeRecord>>(&key).await {
            info!(key = %key, "Fetching employee data from cache");
            return Ok(cached);
        }

        info!(key = %key, "Fetching employee data from database");
        let records = {
            let mut session = self.store.session().await?;
            session.list_employees(&page, order).await?
        };

        self.cache.put(CacheNamespace::Employees, &key, &records).await;
        Ok(records)
    }

    /// Create an employee, creating its department on first use
    pub async fn create(&self, payload: &Value) -> Result<Employee, DomainError> {
        employee_schema()
            .validate(payload, ValidationMode::Strict)
            .map_err(DomainError::invalid_payload)?;
        let request: EmployeePayload = serde_json::from_value(payload.clone())
            .map_err(|e| DomainError::invalid_request(format!("Invalid employee payload: {}", e)))?;

        let mut session = self.store.session().await?;
        let (department, department_created) = session
            .find_or_insert_department(&request.department_name)
            .await?;

        let employee = session
            .insert_employee(NewEmployee {
                employee_name: request.employee_name,
                employee_salary: request.employee_salary,
                department_id: department.id(),
            })
            .await?;
        session.commit().await?;

        self.cache.invalidate(CacheNamespace::Employees).await;
        if department_created {
            info!(department_id = department.id(), name = %department.name(), "Department created for employee");
            self.cache.invalidate(CacheNamespace::Departments).await;
        }

        info!(employee_id = employee.id(), name = %employee.name(), "Employee created");
        Ok(employee)
    }

    /// Apply the supplied fields to the employee with this name
    ///
    /// A `department_name` that matches no department is ignored.
    pub async fn update(&self, name: &str, payload: &Value) -> Result<Employee, DomainError> {
        employee_schema()
            .validate(payload, ValidationMode::Partial)
            .map_err(DomainError::invalid_payload)?;
        let changes: EmployeeChanges = serde_json::from_value(payload.clone())
            .map_err(|e| DomainError::invalid_request(format!("Invalid employee payload: {}", e)))?;

        let mut session = self.store.session().await?;
        let mut employee = session
            .find_employee_by_name(name)
            .await?
            .ok_or_else(|| DomainError::not_found(EMPLOYEE_NOT_FOUND))?;

        if let Some(employee_name) = changes.employee_name {
            employee.set_name(employee_name);
        }

        if let Some(salary) = changes.employee_salary {
            employee.set_salary(salary);
        }

        if let Some(department_name) = changes.department_name {
            match session.find_department_by_name(&department_name).await? {
                Some(department) => employee.set_department(department.id()),
                None => debug!(
                    department = %department_name,
                    "Unknown department in employee update, keeping current"
                ),
            }
        }

        session.update_employee(&employee).await?;
        session.commit().await?;

        self.cache.invalidate(CacheNamespace::Employees).await;

        info!(employee_id = employee.id(), name = %employee.name(), "Employee updated");
        Ok(employee)
    }

    /// Delete the employee with this name
    pub async fn delete(&self, name: &str) -> Result<(), DomainError> {
        let mut session = self.store.session().await?;
        let employee = session
            .find_employee_by_name(name)
            .await?
            .ok_or_else(|| DomainError::not_found(EMPLOYEE_NOT_FOUND))?;

        if !session.delete_employee(employee.id()).await? {
            return Err(DomainError::not_found(EMPLOYEE_NOT_FOUND));
        }
        session.commit().await?;

        self.cache.invalidate(CacheNamespace::Employees).await;

        info!(employee_id = employee.id(), name = %name, "Employee deleted");
        Ok(())
    }
}

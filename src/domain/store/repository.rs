//! Store and session traits

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::department::Department;
use crate::domain::employee::{Employee, EmployeeRecord, NewEmployee};
use crate::domain::{DomainError, Pagination};

/// Sort order for employee listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeOrder {
    /// Ascending by id
    Id,
    /// Descending by salary, ties broken by ascending id
    SalaryDesc,
}

/// Factory of scoped sessions over the directory data
#[async_trait]
pub trait Store: Send + Sync + Debug {
    /// Opens a session; dropping it without `commit` discards its writes
    async fn session(&self) -> Result<Box<dyn StoreSession>, DomainError>;

    /// Round-trips the backend, used by readiness checks
    async fn ping(&self) -> Result<(), DomainError>;
}

/// A unit of work over departments and employees
#[async_trait]
pub trait StoreSession: Send {
    // Departments

    async fn list_departments(&mut self, page: &Pagination) -> Result<Vec<Department>, DomainError>;

    async fn get_department(&mut self, id: i64) -> Result<Option<Department>, DomainError>;

    async fn find_department_by_name(
        &mut self,
        name: &str,
    ) -> Result<Option<Department>, DomainError>;

    async fn insert_department(&mut self, name: &str) -> Result<Department, DomainError>;

    /// Department with this name, inserted if missing; `true` when inserted
    ///
    /// Backends where another session can insert the same name concurrently
    /// must override this so the race resolves to the existing row.
    async fn find_or_insert_department(
        &mut self,
        name: &str,
    ) -> Result<(Department, bool), DomainError> {
        match self.find_department_by_name(name).await? {
            Some(department) => Ok((department, false)),
            None => Ok((self.insert_department(name).await?, true)),
        }
    }

    async fn update_department(&mut self, department: &Department) -> Result<(), DomainError>;

    /// Deletes a department; `Conflict` if employees still reference it
    async fn delete_department(&mut self, id: i64) -> Result<bool, DomainError>;

    /// Number of employees referencing a department
    async fn count_employees_in(&mut self, department_id: i64) -> Result<i64, DomainError>;

    // Employees

    async fn list_employees(
        &mut self,
        page: &Pagination,
        order: EmployeeOrder,
    ) -> Result<Vec<EmployeeRecord>, DomainError>;

    /// Employee with the given name and the lowest id
    async fn find_employee_by_name(&mut self, name: &str) -> Result<Option<Employee>, DomainError>;

    async fn insert_employee(&mut self, employee: NewEmployee) -> Result<Employee, DomainError>;

    async fn update_employee(&mut self, employee: &Employee) -> Result<(), DomainError>;

    async fn delete_employee(&mut self, id: i64) -> Result<bool, DomainError>;

    /// Makes every write of this session durable
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}

//! Employee entity and its wire shapes

use serde::{Deserialize, Serialize};

/// A person assigned to exactly one department
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    id: i64,
    employee_name: String,
    employee_salary: i64,
    department_id: i64,
}

impl Employee {
    pub fn new(
        id: i64,
        employee_name: impl Into<String>,
        employee_salary: i64,
        department_id: i64,
    ) -> Self {
        Self {
            id,
            employee_name: employee_name.into(),
            employee_salary,
            department_id,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.employee_name
    }

    pub fn salary(&self) -> i64 {
        self.employee_salary
    }

    pub fn department_id(&self) -> i64 {
        self.department_id
    }

    pub fn set_name(&mut self, employee_name: impl Into<String>) {
        self.employee_name = employee_name.into();
    }

    pub fn set_salary(&mut self, employee_salary: i64) {
        self.employee_salary = employee_salary;
    }

    pub fn set_department(&mut self, department_id: i64) {
        self.department_id = department_id;
    }
}

/// Employee not yet persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub employee_name: String,
    pub employee_salary: i64,
    pub department_id: i64,
}

/// Listing row with the department name resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub employee_name: String,
    pub department_name: String,
    pub salary: i64,
}

/// Body of an employee create request, read after validation
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeePayload {
    pub employee_name: String,
    pub department_name: String,
    pub employee_salary: i64,
}

/// Body of an employee update request; absent fields stay unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeChanges {
    pub employee_name: Option<String>,
    pub department_name: Option<String>,
    pub employee_salary: Option<i64>,
}

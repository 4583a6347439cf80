//! PostgreSQL directory store with connection pooling

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, Row, Transaction};

use crate::domain::department::Department;
use crate::domain::employee::{Employee, EmployeeRecord, NewEmployee};
use crate::domain::store::{EmployeeOrder, Store, StoreSession};
use crate::domain::{DomainError, Pagination};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL pool configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/workforce".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Opens a pool with these settings
    pub async fn connect(&self) -> Result<PgPool, DomainError> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .connect(&self.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
    }
}

/// Store over the `departments` and `employees` tables
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn session(&self) -> Result<Box<dyn StoreSession>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        Ok(Box::new(PostgresSession { tx }))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::storage(format!("Database ping failed: {}", e)))
    }
}

/// One database transaction; sqlx rolls it back when dropped uncommitted
pub struct PostgresSession {
    tx: Transaction<'static, Postgres>,
}

fn has_error_code(error: &sqlx::Error, expected: &str) -> bool {
    error
        .as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|code| code == expected)
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    has_error_code(error, UNIQUE_VIOLATION)
}

fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    has_error_code(error, FOREIGN_KEY_VIOLATION)
}

fn to_db_salary(salary: i64) -> Result<i32, DomainError> {
    i32::try_from(salary)
        .map_err(|_| DomainError::validation(format!("Salary {} is out of range", salary)))
}

fn row_to_department(row: &PgRow) -> Result<Department, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| DomainError::storage(format!("Invalid department row: {}", e)))?;
    let name: String = row
        .try_get("department_name")
        .map_err(|e| DomainError::storage(format!("Invalid department row: {}", e)))?;

    Ok(Department::new(id, name))
}

fn row_to_employee(row: &PgRow) -> Result<Employee, DomainError> {
    let read = |e: sqlx::Error| DomainError::storage(format!("Invalid employee row: {}", e));

    let id: i64 = row.try_get("id").map_err(read)?;
    let name: String = row.try_get("employee_name").map_err(read)?;
    let salary: i32 = row.try_get("employee_salary").map_err(read)?;
    let department_id: i64 = row.try_get("department_id").map_err(read)?;

    Ok(Employee::new(id, name, salary.into(), department_id))
}

fn row_to_record(row: &PgRow) -> Result<EmployeeRecord, DomainError> {
    let read = |e: sqlx::Error| DomainError::storage(format!("Invalid employee row: {}", e));

    let salary: i32 = row.try_get("employee_salary").map_err(read)?;

    Ok(EmployeeRecord {
        employee_name: row.try_get("employee_name").map_err(read)?,
        department_name: row.try_get("department_name").map_err(read)?,
        salary: salary.into(),
    })
}

#[async_trait]
impl StoreSession for PostgresSession {
    async fn list_departments(&mut self, page: &Pagination) -> Result<Vec<Department>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, department_name FROM departments ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list departments: {}", e)))?;

        rows.iter().map(row_to_department).collect()
    }

    async fn get_department(&mut self, id: i64) -> Result<Option<Department>, DomainError> {
        let row = sqlx::query("SELECT id, department_name FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get department: {}", e)))?;

        row.as_ref().map(row_to_department).transpose()
    }

    async fn find_department_by_name(
        &mut self,
        name: &str,
    ) -> Result<Option<Department>, DomainError> {
        let row =
            sqlx::query("SELECT id, department_name FROM departments WHERE department_name = $1")
                .bind(name)
                .fetch_optional(&mut *self.tx)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to find department by name: {}", e))
                })?;

        row.as_ref().map(row_to_department).transpose()
    }

    async fn insert_department(&mut self, name: &str) -> Result<Department, DomainError> {
        let row = sqlx::query(
            "INSERT INTO departments (department_name) VALUES ($1) RETURNING id, department_name",
        )
        .bind(name)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(format!("Department '{}' already exists", name))
            } else {
                DomainError::storage(format!("Failed to create department: {}", e))
            }
        })?;

        row_to_department(&row)
    }

    async fn find_or_insert_department(
        &mut self,
        name: &str,
    ) -> Result<(Department, bool), DomainError> {
        // waits on a concurrent insert of the same name instead of failing
        let inserted = sqlx::query(
            r#"
            INSERT INTO departments (department_name) VALUES ($1)
            ON CONFLICT (department_name) DO NOTHING
            RETURNING id, department_name
            "#,
        )
        .bind(name)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create department: {}", e)))?;

        if let Some(row) = inserted {
            return Ok((row_to_department(&row)?, true));
        }

        let existing = self.find_department_by_name(name).await?.ok_or_else(|| {
            DomainError::storage(format!(
                "Department '{}' conflicted on insert but was not found",
                name
            ))
        })?;

        Ok((existing, false))
    }

    async fn update_department(&mut self, department: &Department) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE departments SET department_name = $2 WHERE id = $1")
            .bind(department.id())
            .bind(department.name())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::conflict(format!(
                        "Department '{}' already exists",
                        department.name()
                    ))
                } else {
                    DomainError::storage(format!("Failed to update department: {}", e))
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Department {} not found",
                department.id()
            )));
        }

        Ok(())
    }

    async fn delete_department(&mut self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    DomainError::conflict(format!("Department {} still has employees", id))
                } else {
                    DomainError::storage(format!("Failed to delete department: {}", e))
                }
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_employees_in(&mut self, department_id: i64) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE department_id = $1")
            .bind(department_id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count employees: {}", e)))
    }

    async fn list_employees(
        &mut self,
        page: &Pagination,
        order: EmployeeOrder,
    ) -> Result<Vec<EmployeeRecord>, DomainError> {
        let order_by = match order {
            EmployeeOrder::Id => "e.id ASC",
            EmployeeOrder::SalaryDesc => "e.employee_salary DESC, e.id ASC",
        };

        let query = format!(
            r#"
            SELECT e.employee_name, d.department_name, e.employee_salary
            FROM employees e
            JOIN departments d ON d.id = e.department_id
            ORDER BY {}
            LIMIT $1 OFFSET $2
            "#,
            order_by
        );

        let rows = sqlx::query(&query)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list employees: {}", e)))?;

        rows.iter().map(row_to_record).collect()
    }

    async fn find_employee_by_name(&mut self, name: &str) -> Result<Option<Employee>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, employee_name, employee_salary, department_id
            FROM employees
            WHERE employee_name = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to find employee: {}", e)))?;

        row.as_ref().map(row_to_employee).transpose()
    }

    async fn insert_employee(&mut self, employee: NewEmployee) -> Result<Employee, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO employees (employee_name, employee_salary, department_id)
            VALUES ($1, $2, $3)
            RETURNING id, employee_name, employee_salary, department_id
            "#,
        )
        .bind(&employee.employee_name)
        .bind(to_db_salary(employee.employee_salary)?)
        .bind(employee.department_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create employee: {}", e)))?;

        row_to_employee(&row)
    }

    async fn update_employee(&mut self, employee: &Employee) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET employee_name = $2, employee_salary = $3, department_id = $4
            WHERE id = $1
            "#,
        )
        .bind(employee.id())
        .bind(employee.name())
        .bind(to_db_salary(employee.salary())?)
        .bind(employee.department_id())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update employee: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Employee {} not found",
                employee.id()
            )));
        }

        Ok(())
    }

    async fn delete_employee(&mut self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete employee: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))
    }
}

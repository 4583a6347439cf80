//! In-memory directory store
//!
//! Useful for testing and development. Data is lost when the process
//! terminates. A session holds the store lock for its whole lifetime and
//! works on a private copy, so uncommitted writes are never observed.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::department::Department;
use crate::domain::employee::{Employee, EmployeeRecord, NewEmployee};
use crate::domain::store::{EmployeeOrder, Store, StoreSession};
use crate::domain::{DomainError, Pagination};

#[derive(Debug, Clone, Default)]
struct DirectoryState {
    departments: BTreeMap<i64, Department>,
    employees: BTreeMap<i64, Employee>,
    last_department_id: i64,
    last_employee_id: i64,
}

/// Thread-safe in-memory store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<DirectoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn session(&self) -> Result<Box<dyn StoreSession>, DomainError> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();

        Ok(Box::new(InMemorySession { guard, working }))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Session staging writes on a copy of the store state
pub struct InMemorySession {
    guard: OwnedMutexGuard<DirectoryState>,
    working: DirectoryState,
}

impl InMemorySession {
    fn department_name(&self, department_id: i64) -> Result<String, DomainError> {
        self.working
            .departments
            .get(&department_id)
            .map(|d| d.name().to_string())
            .ok_or_else(|| {
                DomainError::storage(format!(
                    "Employee references missing department {}",
                    department_id
                ))
            })
    }

    fn ensure_department_exists(&self, department_id: i64) -> Result<(), DomainError> {
        if self.working.departments.contains_key(&department_id) {
            Ok(())
        } else {
            Err(DomainError::storage(format!(
                "Foreign key violation: department {} does not exist",
                department_id
            )))
        }
    }

    fn ensure_name_free(&self, name: &str, except_id: Option<i64>) -> Result<(), DomainError> {
        let taken = self
            .working
            .departments
            .values()
            .any(|d| d.name() == name && Some(d.id()) != except_id);

        if taken {
            return Err(DomainError::conflict(format!(
                "Department '{}' already exists",
                name
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl StoreSession for InMemorySession {
    async fn list_departments(&mut self, page: &Pagination) -> Result<Vec<Department>, DomainError> {
        Ok(page.apply(self.working.departments.values().cloned()))
    }

    async fn get_department(&mut self, id: i64) -> Result<Option<Department>, DomainError> {
        Ok(self.working.departments.get(&id).cloned())
    }

    async fn find_department_by_name(
        &mut self,
        name: &str,
    ) -> Result<Option<Department>, DomainError> {
        Ok(self
            .working
            .departments
            .values()
            .find(|d| d.name() == name)
            .cloned())
    }

    async fn insert_department(&mut self, name: &str) -> Result<Department, DomainError> {
        self.ensure_name_free(name, None)?;

        self.working.last_department_id += 1;
        let department = Department::new(self.working.last_department_id, name);
        self.working
            .departments
            .insert(department.id(), department.clone());

        Ok(department)
    }

    async fn update_department(&mut self, department: &Department) -> Result<(), DomainError> {
        self.ensure_name_free(department.name(), Some(department.id()))?;

        match self.working.departments.get_mut(&department.id()) {
            Some(stored) => {
                *stored = department.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "Department {} not found",
                department.id()
            ))),
        }
    }

    async fn delete_department(&mut self, id: i64) -> Result<bool, DomainError> {
        if self.count_employees_in(id).await? > 0 {
            return Err(DomainError::conflict(format!(
                "Department {} still has employees",
                id
            )));
        }

        Ok(self.working.departments.remove(&id).is_some())
    }

    async fn count_employees_in(&mut self, department_id: i64) -> Result<i64, DomainError> {
        Ok(self
            .working
            .employees
            .values()
            .filter(|e| e.department_id() == department_id)
            .count() as i64)
    }

    async fn list_employees(
        &mut self,
        page: &Pagination,
        order: EmployeeOrder,
    ) -> Result<Vec<EmployeeRecord>, DomainError> {
        let mut employees: Vec<&Employee> = self.working.employees.values().collect();

        if order == EmployeeOrder::SalaryDesc {
            // stable sort keeps id order among equal salaries
            employees.sort_by(|a, b| b.salary().cmp(&a.salary()));
        }

        page.apply(employees)
            .into_iter()
            .map(|employee| {
                Ok(EmployeeRecord {
                    employee_name: employee.name().to_string(),
                    department_name: self.department_name(employee.department_id())?,
                    salary: employee.salary(),
                })
            })
            .collect()
    }

    async fn find_employee_by_name(&mut self, name: &str) -> Result<Option<Employee>, DomainError> {
        Ok(self
            .working
            .employees
            .values()
            .find(|e| e.name() == name)
            .cloned())
    }

    async fn insert_employee(&mut self, employee: NewEmployee) -> Result<Employee, DomainError> {
        self.ensure_department_exists(employee.department_id)?;

        self.working.last_employee_id += 1;
        let employee = Employee::new(
            self.working.last_employee_id,
            employee.employee_name,
            employee.employee_salary,
            employee.department_id,
        );
        self.working.employees.insert(employee.id(), employee.clone());

        Ok(employee)
    }

    async fn update_employee(&mut self, employee: &Employee) -> Result<(), DomainError> {
        self.ensure_department_exists(employee.department_id())?;

        match self.working.employees.get_mut(&employee.id()) {
            Some(stored) => {
                *stored = employee.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "Employee {} not found",
                employee.id()
            ))),
        }
    }

    async fn delete_employee(&mut self, id: i64) -> Result<bool, DomainError> {
        Ok(self.working.employees.remove(&id).is_some())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let InMemorySession { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

/// Store double answering some reads as a session racing another would
#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Default)]
    pub struct StaleReadStore {
        inner: InMemoryStore,
        hide_departments: bool,
        hide_references: bool,
    }

    impl StaleReadStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Name lookups miss, as if the department was not committed yet
        pub fn hiding_departments(mut self) -> Self {
            self.hide_departments = true;
            self
        }

        /// Employee counts read zero, as if the reference was not committed yet
        pub fn hiding_references(mut self) -> Self {
            self.hide_references = true;
            self
        }

        pub fn inner(&self) -> &InMemoryStore {
            &self.inner
        }
    }

    #[async_trait]
    impl Store for StaleReadStore {
        async fn session(&self) -> Result<Box<dyn StoreSession>, DomainError> {
            Ok(Box::new(StaleReadSession {
                inner: self.inner.session().await?,
                hide_departments: self.hide_departments,
                hide_references: self.hide_references,
            }))
        }

        async fn ping(&self) -> Result<(), DomainError> {
            self.inner.ping().await
        }
    }

    struct StaleReadSession {
        inner: Box<dyn StoreSession>,
        hide_departments: bool,
        hide_references: bool,
    }

    #[async_trait]
    impl StoreSession for StaleReadSession {
        async fn list_departments(
            &mut self,
            page: &Pagination,
        ) -> Result<Vec<Department>, DomainError> {
            self.inner.list_departments(page).await
        }

        async fn get_department(&mut self, id: i64) -> Result<Option<Department>, DomainError> {
            self.inner.get_department(id).await
        }

        async fn find_department_by_name(
            &mut self,
            name: &str,
        ) -> Result<Option<Department>, DomainError> {
            if self.hide_departments {
                return Ok(None);
            }
            self.inner.find_department_by_name(name).await
        }

        async fn insert_department(&mut self, name: &str) -> Result<Department, DomainError> {
            self.inner.insert_department(name).await
        }

        async fn find_or_insert_department(
            &mut self,
            name: &str,
        ) -> Result<(Department, bool), DomainError> {
            self.inner.find_or_insert_department(name).await
        }

        async fn update_department(&mut self, department: &Department) -> Result<(), DomainError> {
            self.inner.update_department(department).await
        }

        async fn delete_department(&mut self, id: i64) -> Result<bool, DomainError> {
            self.inner.delete_department(id).await
        }

        async fn count_employees_in(&mut self, department_id: i64) -> Result<i64, DomainError> {
            if self.hide_references {
                return Ok(0);
            }
            self.inner.count_employees_in(department_id).await
        }

        async fn list_employees(
            &mut self,
            page: &Pagination,
            order: EmployeeOrder,
        ) -> Result<Vec<EmployeeRecord>, DomainError> {
            self.inner.list_employees(page, order).await
        }

        async fn find_employee_by_name(
            &mut self,
            name: &str,
        ) -> Result<Option<Employee>, DomainError> {
            self.inner.find_employee_by_name(name).await
        }

        async fn insert_employee(
            &mut self,
            employee: NewEmployee,
        ) -> Result<Employee, DomainError> {
            self.inner.insert_employee(employee).await
        }

        async fn update_employee(&mut self, employee: &Employee) -> Result<(), DomainError> {
            self.inner.update_employee(employee).await
        }

        async fn delete_employee(&mut self, id: i64) -> Result<bool, DomainError> {
            self.inner.delete_employee(id).await
        }

        async fn commit(self: Box<Self>) -> Result<(), DomainError> {
            self.inner.commit().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_employee(name: &str, salary: i64, department_id: i64) -> NewEmployee {
        NewEmployee {
            employee_name: name.to_string(),
            employee_salary: salary,
            department_id,
        }
    }

    #[tokio::test]
    async fn test_commit_makes_writes_visible() {
        let store = InMemoryStore::new();

        let mut session = store.session().await.unwrap();
        let department = session.insert_department("Engineering").await.unwrap();
        session.commit().await.unwrap();

        let mut session = store.session().await.unwrap();
        let found = session.get_department(department.id()).await.unwrap();
        assert_eq!(found.unwrap().name(), "Engineering");
    }

    #[tokio::test]
    async fn test_dropped_session_discards_writes() {
        let store = InMemoryStore::new();

        {
            let mut session = store.session().await.unwrap();
            session.insert_department("Engineering").await.unwrap();
        }

        let mut session = store.session().await.unwrap();
        let page = Pagination::default();
        assert!(session.list_departments(&page).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rolled_back_insert_leaves_no_trace() {
        let store = InMemoryStore::new();

        {
            let mut session = store.session().await.unwrap();
            session.insert_department("Engineering").await.unwrap();
        }

        let mut session = store.session().await.unwrap();
        let department = session.insert_department("Research").await.unwrap();
        assert_eq!(department.id(), 1);
    }

    #[tokio::test]
    async fn test_department_names_are_unique() {
        let store = InMemoryStore::new();
        let mut session = store.session().await.unwrap();

        session.insert_department("Engineering").await.unwrap();
        let result = session.insert_department("Engineering").await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_list_departments_paginates_by_id() {
        let store = InMemoryStore::new();
        let mut session = store.session().await.unwrap();

        for name in ["Alpha", "Bravo", "Charlie", "Delta", "Echo"] {
            session.insert_department(name).await.unwrap();
        }

        let page = Pagination::new(2, 1).unwrap();
        let names: Vec<String> = session
            .list_departments(&page)
            .await
            .unwrap()
            .iter()
            .map(|d| d.name().to_string())
            .collect();

        assert_eq!(names, vec!["Bravo", "Charlie"]);
    }

    #[tokio::test]
    async fn test_list_employees_by_salary_desc() {
        let store = InMemoryStore::new();
        let mut session = store.session().await.unwrap();
        let department = session.insert_department("Engineering").await.unwrap();

        session
            .insert_employee(new_employee("Low", 100, department.id()))
            .await
            .unwrap();
        session
            .insert_employee(new_employee("High", 9000, department.id()))
            .await
            .unwrap();
        session
            .insert_employee(new_employee("Tied", 9000, department.id()))
            .await
            .unwrap();

        let records = session
            .list_employees(&Pagination::default(), EmployeeOrder::SalaryDesc)
            .await
            .unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.employee_name.as_str()).collect();

        assert_eq!(names, vec!["High", "Tied", "Low"]);
        assert_eq!(records[0].department_name, "Engineering");
    }

    #[tokio::test]
    async fn test_find_employee_by_name_returns_lowest_id() {
        let store = InMemoryStore::new();
        let mut session = store.session().await.unwrap();
        let department = session.insert_department("Engineering").await.unwrap();

        let first = session
            .insert_employee(new_employee("Ada Lovelace", 5000, department.id()))
            .await
            .unwrap();
        session
            .insert_employee(new_employee("Ada Lovelace", 6000, department.id()))
            .await
            .unwrap();

        let found = session.find_employee_by_name("Ada Lovelace").await.unwrap();
        assert_eq!(found.unwrap().id(), first.id());
    }

    #[tokio::test]
    async fn test_employee_requires_existing_department() {
        let store = InMemoryStore::new();
        let mut session = store.session().await.unwrap();

        let result = session.insert_employee(new_employee("Ada Lovelace", 5000, 42)).await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_referenced_department_cannot_be_deleted() {
        let store = InMemoryStore::new();
        let mut session = store.session().await.unwrap();
        let department = session.insert_department("Engineering").await.unwrap();
        session
            .insert_employee(new_employee("Ada Lovelace", 5000, department.id()))
            .await
            .unwrap();

        assert_eq!(session.count_employees_in(department.id()).await.unwrap(), 1);
        assert!(matches!(
            session.delete_department(department.id()).await,
            Err(DomainError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_employee() {
        let store = InMemoryStore::new();
        let mut session = store.session().await.unwrap();
        let department = session.insert_department("Engineering").await.unwrap();
        let employee = session
            .insert_employee(new_employee("Ada Lovelace", 5000, department.id()))
            .await
            .unwrap();

        assert!(session.delete_employee(employee.id()).await.unwrap());
        assert!(!session.delete_employee(employee.id()).await.unwrap());
    }
}

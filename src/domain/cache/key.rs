//! Deterministic cache keys for directory reads

use std::fmt;

use crate::domain::Pagination;

/// Group of keys invalidated together on writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
    Departments,
    Employees,
}

impl CacheNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheNamespace::Departments => "departments",
            CacheNamespace::Employees => "employees",
        }
    }

    /// Glob matching every key of this namespace on the backend
    pub fn pattern(&self) -> String {
        format!("{}_*", self.as_str())
    }
}

impl fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key builders for each cached read
pub struct CacheKeys;

impl CacheKeys {
    pub fn departments(page: &Pagination) -> String {
        format!("departments_{}_{}", page.limit(), page.offset())
    }

    pub fn employees(page: &Pagination) -> String {
        format!("employees_{}_{}", page.limit(), page.offset())
    }

    pub fn employees_by_salary(page: &Pagination) -> String {
        format!("employees_salary_{}_{}", page.limit(), page.offset())
    }

    pub fn department(id: i64) -> String {
        format!("department_{}", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_keys() {
        let page = Pagination::new(2, 1).unwrap();

        assert_eq!(CacheKeys::departments(&page), "departments_2_1");
        assert_eq!(CacheKeys::employees(&page), "employees_2_1");
        assert_eq!(CacheKeys::employees_by_salary(&page), "employees_salary_2_1");
    }

    #[test]
    fn test_default_page_key() {
        assert_eq!(
            CacheKeys::departments(&Pagination::default()),
            "departments_10_0"
        );
    }

    #[test]
    fn test_department_key() {
        assert_eq!(CacheKeys::department(7), "department_7");
    }

    #[test]
    fn test_namespace_pattern() {
        assert_eq!(CacheNamespace::Employees.pattern(), "employees_*");
        assert_eq!(CacheNamespace::Departments.to_string(), "departments");
    }
}

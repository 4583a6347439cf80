//! Department entity and its wire shapes

use serde::{Deserialize, Serialize};

/// A named group that owns employees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    id: i64,
    department_name: String,
}

impl Department {
    pub fn new(id: i64, department_name: impl Into<String>) -> Self {
        Self {
            id,
            department_name: department_name.into(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.department_name
    }

    pub fn rename(&mut self, department_name: impl Into<String>) {
        self.department_name = department_name.into();
    }
}

/// Listing row returned by `GET /departments/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentView {
    pub department_id: i64,
    pub department_name: String,
}

impl From<&Department> for DepartmentView {
    fn from(department: &Department) -> Self {
        Self {
            department_id: department.id,
            department_name: department.department_name.clone(),
        }
    }
}

/// Body of department create and rename requests, read after validation
#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentPayload {
    pub department_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_shape() {
        let department = Department::new(3, "Engineering");
        let json = serde_json::to_value(DepartmentView::from(&department)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"department_id": 3, "department_name": "Engineering"})
        );
    }

    #[test]
    fn test_rename() {
        let mut department = Department::new(1, "Engineering");
        department.rename("Research");

        assert_eq!(department.name(), "Research");
        assert_eq!(department.id(), 1);
    }
}

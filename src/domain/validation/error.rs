//! Field-level validation report

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping of field name to the rules it violated, in check order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violated rule for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();

        write!(f, "{}", parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_groups_by_field() {
        let mut errors = FieldErrors::new();
        errors.add("employee_name", "min length is 3");
        errors.add("employee_name", "value does not match regex '^[a-zA-Z ]+$'");
        errors.add("employee_salary", "min value is 100");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("employee_name").unwrap().len(), 2);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut errors = FieldErrors::new();
        errors.add("department_name", "required field");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"department_name": ["required field"]}));
    }

    #[test]
    fn test_display() {
        let mut errors = FieldErrors::new();
        errors.add("a", "x");
        errors.add("b", "y");

        assert_eq!(errors.to_string(), "a: x; b: y");
    }
}

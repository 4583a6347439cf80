//! Schema rule definitions and the generic interpreter

use regex::Regex;
use serde_json::{Map, Value};

use super::error::FieldErrors;

/// Payload-level key used when the body is not an object at all
const PAYLOAD_FIELD: &str = "payload";

/// Expected JSON type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
}

impl FieldType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.as_i64().is_some(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
        }
    }
}

/// How required flags are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Every required field must be present (creation)
    Strict,
    /// Only supplied fields are checked (partial update)
    Partial,
}

/// Rules for a single field
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field_type: FieldType,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub pattern: Option<Regex>,
}

impl FieldRule {
    fn of_type(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
            pattern: None,
        }
    }

    pub fn string() -> Self {
        Self::of_type(FieldType::String)
    }

    pub fn integer() -> Self {
        Self::of_type(FieldType::Integer)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Checks a present value; rules run in order type, bounds, pattern
    fn check(&self, value: &Value) -> Vec<String> {
        if value.is_null() {
            return vec!["null value not allowed".to_string()];
        }

        if !self.field_type.matches(value) {
            return vec![format!("must be of {} type", self.field_type.name())];
        }

        let mut violations = Vec::new();

        if let Some(text) = value.as_str() {
            let length = text.chars().count();

            if let Some(min) = self.min_length {
                if length < min {
                    violations.push(format!("min length is {}", min));
                }
            }

            if let Some(max) = self.max_length {
                if length > max {
                    violations.push(format!("max length is {}", max));
                }
            }

            if let Some(pattern) = &self.pattern {
                if !pattern.is_match(text) {
                    violations.push(format!(
                        "value does not match regex '{}'",
                        pattern.as_str()
                    ));
                }
            }
        }

        if let Some(number) = value.as_i64() {
            if let Some(min) = self.min {
                if number < min {
                    violations.push(format!("min value is {}", min));
                }
            }

            if let Some(max) = self.max {
                if number > max {
                    violations.push(format!("max value is {}", max));
                }
            }
        }

        violations
    }
}

/// Ordered set of field rules
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(&'static str, FieldRule)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, rule: FieldRule) -> Self {
        self.fields.push((name, rule));
        self
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, rule)| rule)
    }

    /// Validates a JSON payload against this schema
    pub fn validate(&self, payload: &Value, mode: ValidationMode) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        let Some(document) = payload.as_object() else {
            errors.add(PAYLOAD_FIELD, "must be of dict type");
            return Err(errors);
        };

        self.check_unknown(document, &mut errors);

        for (name, rule) in &self.fields {
            match document.get(*name) {
                Some(value) => {
                    for violation in rule.check(value) {
                        errors.add(*name, violation);
                    }
                }
                None => {
                    if rule.required && mode == ValidationMode::Strict {
                        errors.add(*name, "required field");
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn check_unknown(&self, document: &Map<String, Value>, errors: &mut FieldErrors) {
        for key in document.keys() {
            if self.rule(key).is_none() {
                errors.add(key.clone(), "unknown field");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name_schema() -> Schema {
        Schema::new().field(
            "name",
            FieldRule::string()
                .required()
                .length(3, 10)
                .pattern(Regex::new("^[a-z]+$").unwrap()),
        )
    }

    #[test]
    fn test_accepts_valid_payload() {
        let schema = name_schema();
        assert!(schema.validate(&json!({"name": "alice"}), ValidationMode::Strict).is_ok());
    }

    #[test]
    fn test_strict_requires_fields() {
        let schema = name_schema();
        let errors = schema.validate(&json!({}), ValidationMode::Strict).unwrap_err();

        assert_eq!(errors.get("name").unwrap(), ["required field"]);
    }

    #[test]
    fn test_partial_skips_missing_fields() {
        let schema = name_schema();
        assert!(schema.validate(&json!({}), ValidationMode::Partial).is_ok());
    }

    #[test]
    fn test_partial_still_checks_supplied_fields() {
        let schema = name_schema();
        let errors = schema
            .validate(&json!({"name": "ab"}), ValidationMode::Partial)
            .unwrap_err();

        assert_eq!(errors.get("name").unwrap(), ["min length is 3"]);
    }

    #[test]
    fn test_type_mismatch_stops_field_checks() {
        let schema = name_schema();
        let errors = schema
            .validate(&json!({"name": 12}), ValidationMode::Strict)
            .unwrap_err();

        assert_eq!(errors.get("name").unwrap(), ["must be of string type"]);
    }

    #[test]
    fn test_length_then_pattern_order() {
        let schema = name_schema();
        let errors = schema
            .validate(&json!({"name": "A1"}), ValidationMode::Strict)
            .unwrap_err();

        assert_eq!(
            errors.get("name").unwrap(),
            ["min length is 3", "value does not match regex '^[a-z]+$'"]
        );
    }

    #[test]
    fn test_max_length() {
        let schema = name_schema();
        let errors = schema
            .validate(&json!({"name": "abcdefghijk"}), ValidationMode::Strict)
            .unwrap_err();

        assert_eq!(errors.get("name").unwrap(), ["max length is 10"]);
    }

    #[test]
    fn test_null_rejected() {
        let schema = name_schema();
        let errors = schema
            .validate(&json!({"name": null}), ValidationMode::Partial)
            .unwrap_err();

        assert_eq!(errors.get("name").unwrap(), ["null value not allowed"]);
    }

    #[test]
    fn test_unknown_field() {
        let schema = name_schema();
        let errors = schema
            .validate(&json!({"name": "alice", "age": 3}), ValidationMode::Strict)
            .unwrap_err();

        assert_eq!(errors.get("age").unwrap(), ["unknown field"]);
        assert!(!errors.contains("name"));
    }

    #[test]
    fn test_non_object_payload() {
        let schema = name_schema();
        let errors = schema
            .validate(&json!(["alice"]), ValidationMode::Strict)
            .unwrap_err();

        assert!(errors.contains("payload"));
    }

    #[test]
    fn test_integer_bounds() {
        let schema = Schema::new().field("n", FieldRule::integer().min(100).max(200));

        assert!(schema.validate(&json!({"n": 150}), ValidationMode::Strict).is_ok());

        let low = schema.validate(&json!({"n": 99}), ValidationMode::Strict).unwrap_err();
        assert_eq!(low.get("n").unwrap(), ["min value is 100"]);

        let high = schema.validate(&json!({"n": 201}), ValidationMode::Strict).unwrap_err();
        assert_eq!(high.get("n").unwrap(), ["max value is 200"]);
    }

    #[test]
    fn test_integer_rejects_float_and_string() {
        let schema = Schema::new().field("n", FieldRule::integer());

        let float = schema.validate(&json!({"n": 150.5}), ValidationMode::Strict).unwrap_err();
        assert_eq!(float.get("n").unwrap(), ["must be of integer type"]);

        let text = schema.validate(&json!({"n": "150"}), ValidationMode::Strict).unwrap_err();
        assert_eq!(text.get("n").unwrap(), ["must be of integer type"]);
    }

    #[test]
    fn test_length_counts_characters() {
        let schema = Schema::new().field("s", FieldRule::string().length(3, 3));
        assert!(schema.validate(&json!({"s": "äöü"}), ValidationMode::Strict).is_ok());
    }
}

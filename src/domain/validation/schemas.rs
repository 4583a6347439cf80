//! Built-in payload schemas for directory entities

use once_cell::sync::Lazy;
use regex::Regex;

use super::schema::{FieldRule, Schema};

/// Letters and spaces only
pub static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z ]+$").expect("name pattern is a valid regex"));

pub const NAME_MIN_LENGTH: usize = 3;
pub const NAME_MAX_LENGTH: usize = 100;
pub const SALARY_MIN: i64 = 100;
/// Largest salary the `INTEGER` column holds
pub const SALARY_MAX: i64 = i32::MAX as i64;

static DEPARTMENT_SCHEMA: Lazy<Schema> =
    Lazy::new(|| Schema::new().field("department_name", name_rule()));

static EMPLOYEE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .field("employee_name", name_rule())
        .field("department_name", name_rule())
        .field(
            "employee_salary",
            FieldRule::integer()
                .required()
                .min(SALARY_MIN)
                .max(SALARY_MAX),
        )
});

fn name_rule() -> FieldRule {
    FieldRule::string()
        .required()
        .length(NAME_MIN_LENGTH, NAME_MAX_LENGTH)
        .pattern(NAME_PATTERN.clone())
}

/// Schema for department create and rename payloads
pub fn department_schema() -> &'static Schema {
    &DEPARTMENT_SCHEMA
}

/// Schema for employee create and update payloads
pub fn employee_schema() -> &'static Schema {
    &EMPLOYEE_SCHEMA
}

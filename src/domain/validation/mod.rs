//! Declarative payload validation
//!
//! Schemas are plain data (`Schema` of `FieldRule`s) interpreted by a single
//! routine, so the department and employee rules live next to each other in
//! `schemas` rather than being spread across handlers.

mod error;
mod schema;
mod schemas;

pub use error::FieldErrors;
pub use schema::{FieldRule, FieldType, Schema, ValidationMode};
pub use schemas::{department_schema, employee_schema, NAME_PATTERN};

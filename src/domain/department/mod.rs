//! Department domain

mod entity;

pub use entity::{Department, DepartmentPayload, DepartmentView};

//! Employee domain

mod entity;

pub use entity::{Employee, EmployeeChanges, EmployeePayload, EmployeeRecord, NewEmployee};

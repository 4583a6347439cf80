//! Domain layer - directory entities, validation and the store/cache seams

pub mod cache;
pub mod department;
pub mod employee;
pub mod error;
pub mod pagination;
pub mod store;
pub mod user;
pub mod validation;

pub use cache::{Cache, CacheExt, CacheKeyIndex, CacheKeys, CacheNamespace};
pub use department::{Department, DepartmentPayload, DepartmentView};
pub use employee::{Employee, EmployeeChanges, EmployeePayload, EmployeeRecord, NewEmployee};
pub use error::DomainError;
pub use pagination::{Pagination, PaginationParams};
pub use store::{EmployeeOrder, Store, StoreSession};
pub use user::{NewUser, User, UserId, UserRepository};
pub use validation::{department_schema, employee_schema, FieldErrors, Schema, ValidationMode};

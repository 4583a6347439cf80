//! Directory store domain
//!
//! A [`Store`] hands out one [`StoreSession`] per operation. Sessions are
//! transactional: writes become visible only after `commit`, and a session
//! dropped on an early return leaves the store untouched.

mod repository;

pub use repository::{EmployeeOrder, Store, StoreSession};

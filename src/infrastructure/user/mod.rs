//! User infrastructure module
//!
//! Password hashing with Argon2, user repositories and the user service
//! backing login and account provisioning.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{CreateUserRequest, UserService};

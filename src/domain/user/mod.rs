//! User domain
//!
//! Login accounts used to obtain API tokens.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUser, User, UserId};
pub use repository::UserRepository;
pub use validation::validate_credentials;

#[cfg(test)]
pub use repository::MockUserRepository;

//! User repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{NewUser, User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by their ID
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their username (for login)
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user, failing with a conflict on a taken username
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Count users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Record a login for a user
    async fn record_login(&self, id: UserId) -> Result<(), DomainError>;
}

//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct UserTable {
    users: BTreeMap<UserId, User>,
    last_id: UserId,
}

/// In-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.table.read().await.users.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .users
            .values()
            .find(|u| u.username() == username)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut table = self.table.write().await;

        if table.users.values().any(|u| u.username() == user.username) {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                user.username
            )));
        }

        table.last_id += 1;
        let user = user.into_user(table.last_id);
        table.users.insert(user.id(), user.clone());

        Ok(user)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.table.read().await.users.len())
    }

    async fn record_login(&self, id: UserId) -> Result<(), DomainError> {
        let mut table = self.table.write().await;

        match table.users.get_mut(&id) {
            Some(user) => {
                user.record_login();
                Ok(())
            }
            None => Err(DomainError::not_found(format!("User '{}' not found", id))),
        }
    }
}

//! User service for authentication and account provisioning

use std::sync::Arc;

use tracing::info;

use crate::domain::user::{validate_credentials, NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// User service for authentication and management
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        validate_credentials(&request.username, &request.password)
            .map_err(DomainError::invalid_payload)?;

        if self
            .repository
            .get_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                request.username
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = self
            .repository
            .create(NewUser::new(&request.username, password_hash))
            .await?;

        info!(user_id = user.id(), username = %user.username(), "User created");
        Ok(user)
    }

    /// Returns the user when the credentials match an active account
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let user = match self.repository.get_by_username(username).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        if !user.is_active() {
            return Ok(None);
        }

        if !self.hasher.verify(password, user.password_hash()) {
            return Ok(None);
        }

        self.repository.record_login(user.id()).await?;

        self.repository.get(user.id()).await
    }

    /// Get a user by ID
    pub async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    /// Count users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

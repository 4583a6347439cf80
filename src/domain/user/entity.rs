//! User entity and related types

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Numeric user identifier assigned by the store
pub type UserId = i64;

/// User entity for authentication
#[derive(Debug, Clone, Serialize)]
pub struct User {
    id: UserId,
    username: String,
    /// Argon2 PHC string, never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Rebuilds a stored user
    pub fn from_parts(
        id: UserId,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        is_active: bool,
        created_at: DateTime<Utc>,
        last_login_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
            is_active,
            created_at,
            last_login_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Record a login
    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }
}

/// A user not yet persisted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Materializes the user under an assigned id
    pub fn into_user(self, id: UserId) -> User {
        User::from_parts(id, self.username, self.password_hash, true, Utc::now(), None)
    }
}

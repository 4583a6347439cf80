//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, username, password_hash, is_active, created_at, last_login_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by username: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query(&format!(
            "INSERT INTO users (username, password_hash, is_active, created_at) \
             VALUES ($1, $2, TRUE, NOW()) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!("Username '{}' already exists", user.username))
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        row_to_user(&row)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }

    async fn record_login(&self, id: UserId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to record login: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        Ok(())
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let read = |e: sqlx::Error| DomainError::storage(format!("Invalid user row: {}", e));

    let id: i64 = row.try_get("id").map_err(read)?;
    let username: String = row.try_get("username").map_err(read)?;
    let password_hash: String = row.try_get("password_hash").map_err(read)?;
    let is_active: bool = row.try_get("is_active").map_err(read)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(read)?;
    let last_login_at: Option<DateTime<Utc>> = row.try_get("last_login_at").map_err(read)?;

    Ok(User::from_parts(
        id,
        username,
        password_hash,
        is_active,
        created_at,
        last_login_at,
    ))
}

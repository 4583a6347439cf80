//! Database migrations infrastructure

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// Applies versioned migrations, recording each in `_migrations`
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    /// Runs a single migration, returning whether it was applied now
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        let applied: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)",
        )
        .bind(migration.version)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to check migration status: {}", e)))?;

        if applied {
            return Ok(false);
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::storage(format!("Failed to begin migration transaction: {}", e))
        })?;

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit().await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to commit migration {}: {}",
                migration.version, e
            ))
        })?;

        info!(
            version = migration.version,
            description = migration.description,
            "Applied migration"
        );

        Ok(true)
    }

    /// Returns the latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))
    }
}

/// A versioned schema change
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub up: &'static str,
}

/// Schema of the directory tables
pub fn directory_migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            description: "Create departments table",
            up: r#"
            CREATE TABLE IF NOT EXISTS departments (
                id BIGSERIAL PRIMARY KEY,
                department_name VARCHAR(100) NOT NULL UNIQUE
            );
            "#,
        },
        Migration {
            version: 2,
            description: "Create employees table",
            up: r#"
            CREATE TABLE IF NOT EXISTS employees (
                id BIGSERIAL PRIMARY KEY,
                employee_name VARCHAR(100) NOT NULL,
                employee_salary INTEGER NOT NULL,
                department_id BIGINT NOT NULL REFERENCES departments(id)
            );
            CREATE INDEX IF NOT EXISTS idx_employees_name ON employees(employee_name);
            CREATE INDEX IF NOT EXISTS idx_employees_salary ON employees(employee_salary DESC);
            "#,
        },
        Migration {
            version: 3,
            description: "Create users table",
            up: r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                username VARCHAR(150) NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                last_login_at TIMESTAMPTZ
            );
            "#,
        },
    ]
}

/// Runs all pending directory migrations, returning how many were applied
pub async fn run_migrations(pool: &PgPool) -> Result<usize, DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());
    let mut applied = 0;

    for migration in directory_migrations() {
        if migrator.run_migration(&migration).await? {
            applied += 1;
        }
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_order() {
        let migrations = directory_migrations();

        for pair in migrations.windows(2) {
            assert!(
                pair[1].version > pair[0].version,
                "Migrations should be in ascending order"
            );
        }
    }

    #[test]
    fn test_migrations_content() {
        for migration in directory_migrations() {
            assert!(!migration.description.is_empty());
            assert!(migration.up.contains("CREATE TABLE IF NOT EXISTS"));
        }
    }

    #[test]
    fn test_employees_reference_departments() {
        let migrations = directory_migrations();
        let employees = migrations
            .iter()
            .find(|m| m.up.contains("employees ("))
            .unwrap();

        assert!(employees.up.contains("REFERENCES departments(id)"));
    }
}

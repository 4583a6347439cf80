//! Migrate command - applies the bootstrap schema and exits

use tracing::info;

use crate::infrastructure::storage::{run_migrations, PostgresMigrator};

pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let pool = crate::postgres_config(&config)?.connect().await?;
    let applied = run_migrations(&pool).await?;
    let version = PostgresMigrator::new(pool).current_version().await?;

    info!(applied, version = ?version, "Migrations complete");
    Ok(())
}

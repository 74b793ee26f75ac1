//! Migrate command - applies the todo schema to PostgreSQL

use anyhow::Context;
use tracing::info;

use crate::infrastructure::storage::{connect, run_todo_migrations, PostgresMigrator};

/// Apply pending migrations against the configured database
///
/// Runs regardless of the configured storage backend, so the schema can be
/// prepared before switching the service over to PostgreSQL.
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let pool = connect(&config.database.postgres())
        .await
        .context("failed to connect to the database")?;

    let applied = run_todo_migrations(&pool).await?;
    let version = PostgresMigrator::new(pool.clone()).current_version().await?;

    info!(applied, version = ?version, "Migrations complete");
    pool.close().await;

    Ok(())
}

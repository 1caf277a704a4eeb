//! Migrate command - applies or reverts schema migrations

use anyhow::Context;
use tracing::info;

use super::MigrateArgs;
use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::storage::{self, revert_last_migration, run_migrations, PostgresConfig};

/// Run migrations against `storage.database_url`
pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_logging(&config.logging)?;

    let pg_config = PostgresConfig::from_settings(&config.storage)?;
    let pool = storage::connect(&pg_config).await?;

    if args.revert {
        match revert_last_migration(&pool).await? {
            Some(version) => info!(version, "Migration reverted"),
            None => info!("No migrations to revert"),
        }
    } else {
        let applied = run_migrations(&pool).await?;
        info!(applied, "Migrations complete");
    }

    pool.close().await;

    Ok(())
}

//! Migrate command - applies PostgreSQL migrations and exits

use clap::Args;
use tracing::info;

use crate::infrastructure::storage::{
    connect, revert_last_storage_migration, run_storage_migrations, PostgresConfig,
};

#[derive(Debug, Clone, Args)]
pub struct MigrateArgs {
    /// Revert the most recently applied migration instead of applying pending ones
    #[arg(long)]
    pub revert: bool,

    /// Database URL, overriding `storage.database_url`
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();

    let url = args
        .database_url
        .unwrap_or_else(|| config.storage.database_url.clone());
    let pool = connect(
        &PostgresConfig::new(url).with_max_connections(config.storage.max_connections),
    )
    .await?;

    let version = if args.revert {
        revert_last_storage_migration(&pool).await?
    } else {
        run_storage_migrations(&pool).await?
    };

    match version {
        Some(version) => info!("Schema is at version {}", version),
        None => info!("Schema has no applied migrations"),
    }

    pool.close().await;

    Ok(())
}

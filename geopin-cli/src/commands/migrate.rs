//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use geopin_server::db::{create_pool, migrations, PoolSettings};

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,
}

/// Apply all schema statements; safe to run repeatedly.
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let pool = create_pool(&args.database_url, &PoolSettings::single())
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to apply migrations")?;

    tracing::info!("Migrations applied");
    Ok(())
}

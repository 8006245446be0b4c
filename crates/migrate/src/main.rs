//! `hzrdr-migrate` -- applies the hazard results schema migrations.
//!
//! Every migration runs in its own transaction: either it is applied in
//! full or the database is left at the previous version.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};
use config::MigrateConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hzrdr_migrate=info,hzrdr_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = MigrateConfig::from_env()?;

    let pool = hzrdr_db::create_pool(
        &config.database_url,
        config.max_connections,
        config.acquire_timeout,
    )
    .await
    .context("Failed to connect to database")?;
    tracing::info!(max_connections = config.max_connections, "Database connection pool created");

    hzrdr_db::health_check(&pool)
        .await
        .context("Database health check failed")?;

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run(&pool).await,
        Commands::Status(args) => commands::status(&pool, &args).await,
        Commands::Seed => commands::seed(&pool).await,
        Commands::Verify => commands::verify(&pool).await,
    };

    pool.close().await;
    result
}

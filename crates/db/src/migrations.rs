//! Migration runner and status reporting.
//!
//! Migrations live in `db/migrations` and are embedded at compile time.
//! Each one runs inside its own transaction: a failing statement rolls the
//! whole migration back and leaves the schema at the previous version.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;

use crate::models::migration::{AppliedMigration, MigrationStatus};

pub static MIGRATOR: Migrator = sqlx::migrate!("../../db/migrations");

/// Prior schema version: ruptures, ground motion fields and `gmf_data`.
pub const BASELINE_VERSION: i64 = 20140101000000;

/// Adds `imt` and `gmf_rupture`, rupture site indices, drops `gmf_data`.
pub const IMT_GMF_RUPTURE_VERSION: i64 = 20140301000000;

/// Apply every pending migration in version order.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    let applied = applied_migrations(pool).await?;
    let pending: Vec<_> = MIGRATOR
        .iter()
        .filter(|m| !applied.iter().any(|a| a.version == m.version && a.success))
        .collect();

    if pending.is_empty() {
        tracing::info!("Database schema is up to date");
        return Ok(());
    }

    for migration in &pending {
        tracing::info!(
            version = migration.version,
            description = %migration.description,
            "Pending migration"
        );
    }

    MIGRATOR.run(pool).await?;
    tracing::info!(applied = pending.len(), "Database migrations applied");
    Ok(())
}

/// Every known migration with whether and when it was applied.
pub async fn status(pool: &PgPool) -> Result<Vec<MigrationStatus>, sqlx::Error> {
    let applied = applied_migrations(pool).await?;
    Ok(MIGRATOR
        .iter()
        .map(|m| {
            let row = applied.iter().find(|a| a.version == m.version);
            MigrationStatus {
                version: m.version,
                description: m.description.to_string(),
                applied: row.is_some_and(|r| r.success),
                installed_on: row.map(|r| r.installed_on),
            }
        })
        .collect())
}

async fn applied_migrations(pool: &PgPool) -> Result<Vec<AppliedMigration>, sqlx::Error> {
    let exists: bool = sqlx::query_scalar("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
        .fetch_one(pool)
        .await?;
    if !exists {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, AppliedMigration>(
        "SELECT version, description, installed_on, success
         FROM _sqlx_migrations
         ORDER BY version",
    )
    .fetch_all(pool)
    .await
}

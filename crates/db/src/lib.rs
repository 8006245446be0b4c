//! Persistence for hazard results stored in the `hzrdr` PostgreSQL schema.
//!
//! Owns the migration set under `db/migrations`, the connection pool, and
//! the repositories used to register intensity measure types and ground
//! motion fields.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod migrations;
pub mod models;
pub mod repositories;
pub mod seed;
pub mod verify;

pub use error::DbError;
pub use migrations::{run_migrations, MIGRATOR};

pub type DbPool = sqlx::PgPool;

/// Restricted principal that may register results but never alter them.
pub const JOB_INIT_ROLE: &str = "oq_job_init";

/// Create a connection pool from a database URL.
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

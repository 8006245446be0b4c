use hzrdr_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from sqlx's `_sqlx_migrations` bookkeeping table.
#[derive(Debug, Clone, FromRow)]
pub struct AppliedMigration {
    pub version: i64,
    pub description: String,
    pub installed_on: Timestamp,
    pub success: bool,
}

/// A known migration and whether it has been applied.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationStatus {
    pub version: i64,
    pub description: String,
    pub applied: bool,
    pub installed_on: Option<Timestamp>,
}

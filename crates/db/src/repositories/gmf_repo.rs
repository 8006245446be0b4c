//! Repository for the `hzrdr.gmf` table.

use hzrdr_core::types::DbId;
use sqlx::PgPool;

use crate::models::gmf::{CreateGmf, Gmf};

const COLUMNS: &str = "id, display_name, created_at";

pub struct GmfRepo;

impl GmfRepo {
    /// Insert a new ground motion field container, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateGmf) -> Result<Gmf, sqlx::Error> {
        let query = format!(
            "INSERT INTO hzrdr.gmf (display_name) VALUES ($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Gmf>(&query)
            .bind(&input.display_name)
            .fetch_one(pool)
            .await
    }

    /// Find a ground motion field container by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Gmf>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM hzrdr.gmf WHERE id = $1");
        sqlx::query_as::<_, Gmf>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a field and, by cascade, every `gmf_rupture` row stored in it.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM hzrdr.gmf WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

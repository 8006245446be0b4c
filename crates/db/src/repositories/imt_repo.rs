//! Repository for the `hzrdr.imt` table.

use hzrdr_core::imt::Imt;
use hzrdr_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::imt::IntensityMeasureType;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, imt_str, im_type, sa_period, sa_damping";

/// Lookup and registration of intensity measure types.
pub struct ImtRepo;

impl ImtRepo {
    /// List all IMTs in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<IntensityMeasureType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM hzrdr.imt ORDER BY id");
        sqlx::query_as::<_, IntensityMeasureType>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find an IMT by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<IntensityMeasureType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM hzrdr.imt WHERE id = $1");
        sqlx::query_as::<_, IntensityMeasureType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the row for an IMT by its components, ignoring how `imt_str`
    /// happens to be rendered.
    pub async fn find_by_imt(
        pool: &PgPool,
        imt: &Imt,
    ) -> Result<Option<IntensityMeasureType>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM hzrdr.imt
             WHERE im_type = $1
               AND sa_period IS NOT DISTINCT FROM $2
               AND sa_damping IS NOT DISTINCT FROM $3"
        );
        sqlx::query_as::<_, IntensityMeasureType>(&query)
            .bind(imt.kind().code())
            .bind(imt.sa_period())
            .bind(imt.sa_damping())
            .fetch_optional(pool)
            .await
    }

    /// Parse an IMT string such as `SA(0.1)` and find its row.
    pub async fn find_by_str(
        pool: &PgPool,
        imt_str: &str,
    ) -> Result<Option<IntensityMeasureType>, DbError> {
        let imt: Imt = imt_str.parse()?;
        Ok(Self::find_by_imt(pool, &imt).await?)
    }

    /// Return the row for `imt`, inserting it first if absent.
    ///
    /// Existing rows are never modified. Concurrent registrations of the
    /// same IMT converge on a single row.
    pub async fn find_or_create(pool: &PgPool, imt: &Imt) -> Result<IntensityMeasureType, DbError> {
        if let Some(existing) = Self::find_by_imt(pool, imt).await? {
            return Ok(existing);
        }

        let imt_str = imt.to_string();
        let query = format!(
            "INSERT INTO hzrdr.imt (imt_str, im_type, sa_period, sa_damping)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, IntensityMeasureType>(&query)
            .bind(&imt_str)
            .bind(imt.kind().code())
            .bind(imt.sa_period())
            .bind(imt.sa_damping())
            .fetch_optional(pool)
            .await?;

        if let Some(row) = inserted {
            tracing::debug!(id = row.id, imt = %row.imt_str, "Registered intensity measure type");
            return Ok(row);
        }

        // Lost a race, or imt_str is taken by a row with other components.
        Self::find_by_imt(pool, imt).await?.ok_or_else(|| {
            DbError::Conflict(format!(
                "imt_str '{imt_str}' is already used by a different intensity measure type"
            ))
        })
    }
}

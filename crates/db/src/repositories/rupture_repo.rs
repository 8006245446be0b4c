//! Repositories for `hzrdr.probabilistic_rupture` and `hzrdr.ses_rupture`.

use hzrdr_core::ground_motion::validate_site_indices;
use hzrdr_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::rupture::{
    CreateProbabilisticRupture, CreateSesRupture, ProbabilisticRupture, SesRupture,
};

const RUPTURE_COLUMNS: &str = "id, magnitude, rake, tectonic_region_type, \
    is_from_fault_source, site_indices, created_at";

const SES_RUPTURE_COLUMNS: &str = "id, rupture_id, ses_id, tag, seed, created_at";

/// Provides access to probabilistic ruptures.
pub struct ProbabilisticRuptureRepo;

impl ProbabilisticRuptureRepo {
    /// Insert a new rupture, returning the created row.
    ///
    /// If `is_from_fault_source` is `None`, defaults to `false`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProbabilisticRupture,
    ) -> Result<ProbabilisticRupture, DbError> {
        if let Some(indices) = &input.site_indices {
            validate_site_indices(indices)?;
        }
        let query = format!(
            "INSERT INTO hzrdr.probabilistic_rupture
                (magnitude, rake, tectonic_region_type, is_from_fault_source, site_indices)
             VALUES ($1, $2, $3, COALESCE($4, false), $5)
             RETURNING {RUPTURE_COLUMNS}"
        );
        let rupture = sqlx::query_as::<_, ProbabilisticRupture>(&query)
            .bind(input.magnitude)
            .bind(input.rake)
            .bind(&input.tectonic_region_type)
            .bind(input.is_from_fault_source)
            .bind(&input.site_indices)
            .fetch_one(pool)
            .await?;
        Ok(rupture)
    }

    /// Find a rupture by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProbabilisticRupture>, sqlx::Error> {
        let query = format!("SELECT {RUPTURE_COLUMNS} FROM hzrdr.probabilistic_rupture WHERE id = $1");
        sqlx::query_as::<_, ProbabilisticRupture>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Record which sites a rupture affects. Site indices are written once:
    /// returns `None` if the rupture does not exist or already has them.
    ///
    /// Fields stored while the indices were NULL cover the whole site
    /// collection positionally, so a rupture with stored fields is rejected
    /// with [`DbError::Conflict`].
    pub async fn set_site_indices(
        pool: &PgPool,
        id: DbId,
        site_indices: &[i32],
    ) -> Result<Option<ProbabilisticRupture>, DbError> {
        validate_site_indices(site_indices)?;
        let mut tx = pool.begin().await?;

        let current: Option<Option<Vec<i32>>> = sqlx::query_scalar(
            "SELECT site_indices FROM hzrdr.probabilistic_rupture WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        if !matches!(current, Some(None)) {
            return Ok(None);
        }

        let stored_fields: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM hzrdr.gmf_rupture gr
             JOIN hzrdr.ses_rupture sr ON sr.id = gr.rupture_id
             WHERE sr.rupture_id = $1",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if stored_fields > 0 {
            return Err(DbError::Conflict(format!(
                "rupture {id} already has {stored_fields} ground motion fields stored without site indices"
            )));
        }

        let query = format!(
            "UPDATE hzrdr.probabilistic_rupture SET site_indices = $2
             WHERE id = $1
             RETURNING {RUPTURE_COLUMNS}"
        );
        let rupture = sqlx::query_as::<_, ProbabilisticRupture>(&query)
            .bind(id)
            .bind(site_indices)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(rupture))
    }

    /// Delete a rupture together with its event set occurrences and their
    /// ground motion fields. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM hzrdr.probabilistic_rupture WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Provides access to stochastic event set ruptures.
pub struct SesRuptureRepo;

impl SesRuptureRepo {
    /// Insert a new event set rupture, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSesRupture) -> Result<SesRupture, sqlx::Error> {
        let query = format!(
            "INSERT INTO hzrdr.ses_rupture (rupture_id, ses_id, tag, seed)
             VALUES ($1, $2, $3, $4)
             RETURNING {SES_RUPTURE_COLUMNS}"
        );
        sqlx::query_as::<_, SesRupture>(&query)
            .bind(input.rupture_id)
            .bind(input.ses_id)
            .bind(&input.tag)
            .bind(input.seed)
            .fetch_one(pool)
            .await
    }

    /// Find an event set rupture by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SesRupture>, sqlx::Error> {
        let query = format!("SELECT {SES_RUPTURE_COLUMNS} FROM hzrdr.ses_rupture WHERE id = $1");
        sqlx::query_as::<_, SesRupture>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an event set rupture and, by cascade, its ground motion fields.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM hzrdr.ses_rupture WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Repository for the `hzrdr.gmf_rupture` table.

use hzrdr_core::ground_motion::{align_by_rupture, validate_field, value_for_site, AlignedGroundMotion};
use hzrdr_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::gmf_rupture::{CreateGmfRupture, GmfRupture, SiteGroundMotion};

const COLUMNS: &str = "id, rupture_id, gmf_id, imt_id, ground_motion_field";

/// Storage and per-site retrieval of ground motion fields.
pub struct GmfRuptureRepo;

impl GmfRuptureRepo {
    /// Store the field of one event set rupture for one IMT.
    ///
    /// When the underlying probabilistic rupture records `site_indices`,
    /// the field must hold exactly one value per listed site. References are
    /// checked by the foreign keys, so a missing rupture, field or IMT
    /// surfaces as a foreign key violation.
    pub async fn create(pool: &PgPool, input: &CreateGmfRupture) -> Result<GmfRupture, DbError> {
        let mut tx = pool.begin().await?;

        // Hold the rupture's site indices stable until the field is stored.
        let site_indices: Option<Vec<i32>> = sqlx::query_scalar::<_, Option<Vec<i32>>>(
            "SELECT pr.site_indices
             FROM hzrdr.ses_rupture sr
             JOIN hzrdr.probabilistic_rupture pr ON pr.id = sr.rupture_id
             WHERE sr.id = $1
             FOR SHARE OF pr",
        )
        .bind(input.rupture_id)
        .fetch_optional(&mut *tx)
        .await?
        .flatten();

        validate_field(site_indices.as_deref(), &input.ground_motion_field)?;

        let query = format!(
            "INSERT INTO hzrdr.gmf_rupture (rupture_id, gmf_id, imt_id, ground_motion_field)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, GmfRupture>(&query)
            .bind(input.rupture_id)
            .bind(input.gmf_id)
            .bind(input.imt_id)
            .bind(&input.ground_motion_field)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(row)
    }

    /// Find a stored field by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<GmfRupture>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM hzrdr.gmf_rupture WHERE id = $1");
        sqlx::query_as::<_, GmfRupture>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All fields stored in a ground motion field container, ordered by rupture.
    pub async fn list_by_gmf(pool: &PgPool, gmf_id: DbId) -> Result<Vec<GmfRupture>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM hzrdr.gmf_rupture
             WHERE gmf_id = $1
             ORDER BY rupture_id, imt_id, id"
        );
        sqlx::query_as::<_, GmfRupture>(&query)
            .bind(gmf_id)
            .fetch_all(pool)
            .await
    }

    /// All fields computed for one event set rupture.
    pub async fn list_by_rupture(
        pool: &PgPool,
        rupture_id: DbId,
    ) -> Result<Vec<GmfRupture>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM hzrdr.gmf_rupture
             WHERE rupture_id = $1
             ORDER BY gmf_id, imt_id, id"
        );
        sqlx::query_as::<_, GmfRupture>(&query)
            .bind(rupture_id)
            .fetch_all(pool)
            .await
    }

    /// Values of one site for one IMT in a field container, one per event
    /// set rupture that affected the site, ordered by rupture.
    pub async fn gmvs_for_site(
        pool: &PgPool,
        gmf_id: DbId,
        imt_id: DbId,
        site: i32,
    ) -> Result<Vec<SiteGroundMotion>, sqlx::Error> {
        let rows: Vec<(DbId, Vec<f64>, Option<Vec<i32>>)> = sqlx::query_as(
            "SELECT gr.rupture_id, gr.ground_motion_field, pr.site_indices
             FROM hzrdr.gmf_rupture gr
             JOIN hzrdr.ses_rupture sr ON sr.id = gr.rupture_id
             JOIN hzrdr.probabilistic_rupture pr ON pr.id = sr.rupture_id
             WHERE gr.gmf_id = $1
               AND gr.imt_id = $2
               AND (pr.site_indices IS NULL OR $3 = ANY(pr.site_indices))
             ORDER BY gr.rupture_id, gr.id",
        )
        .bind(gmf_id)
        .bind(imt_id)
        .bind(site)
        .fetch_all(pool)
        .await?;

        let values: Vec<SiteGroundMotion> = rows
            .iter()
            .filter_map(|(rupture_id, field, site_indices)| {
                value_for_site(site_indices.as_deref(), field, site).map(|value| {
                    SiteGroundMotion {
                        rupture_id: *rupture_id,
                        value,
                    }
                })
            })
            .collect();

        if values.is_empty() {
            tracing::warn!(gmf_id, imt_id, site, "No ground motion values for site");
        }
        Ok(values)
    }

    /// Values of several sites aligned on the union of their ruptures, with
    /// `0.0` where a site was not affected.
    pub async fn gmvs_for_sites(
        pool: &PgPool,
        gmf_id: DbId,
        imt_id: DbId,
        sites: &[i32],
    ) -> Result<AlignedGroundMotion, sqlx::Error> {
        let mut per_site = Vec::with_capacity(sites.len());
        for &site in sites {
            let values = Self::gmvs_for_site(pool, gmf_id, imt_id, site).await?;
            let pairs = values.iter().map(|v| (v.rupture_id, v.value)).collect();
            per_site.push((site, pairs));
        }
        Ok(align_by_rupture(&per_site))
    }
}

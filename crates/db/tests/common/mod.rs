#![allow(dead_code)]

use std::path::Path;

use hzrdr_core::imt::Imt;
use hzrdr_db::models::gmf::{CreateGmf, Gmf};
use hzrdr_db::models::imt::IntensityMeasureType;
use hzrdr_db::models::rupture::{
    CreateProbabilisticRupture, CreateSesRupture, ProbabilisticRupture, SesRupture,
};
use hzrdr_db::repositories::{GmfRepo, ImtRepo, ProbabilisticRuptureRepo, SesRuptureRepo};
use sqlx::migrate::Migrator;
use sqlx::PgPool;

const BASELINE_FILE: &str = "20140101000000_hzrdr_baseline.sql";

/// Bring an empty database to the prior schema version only.
///
/// The baseline file is copied into its own directory so sqlx records the
/// same version and checksum the full migrator expects.
pub async fn apply_baseline(pool: &PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let source = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../db/migrations")
        .join(BASELINE_FILE);
    std::fs::copy(&source, dir.path().join(BASELINE_FILE)).unwrap();

    let migrator = Migrator::new(dir.path()).await.unwrap();
    migrator.run(pool).await.unwrap();
}

pub async fn relation_exists(pool: &PgPool, name: &str) -> bool {
    sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn column_exists(pool: &PgPool, table: &str, column: &str) -> bool {
    sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT 1 FROM information_schema.columns
            WHERE table_schema = 'hzrdr' AND table_name = $1 AND column_name = $2
        )",
    )
    .bind(table)
    .bind(column)
    .fetch_one(pool)
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn new_rupture(site_indices: Option<Vec<i32>>) -> CreateProbabilisticRupture {
    CreateProbabilisticRupture {
        magnitude: 6.5,
        rake: 90.0,
        tectonic_region_type: "Active Shallow Crust".to_string(),
        is_from_fault_source: None,
        site_indices,
    }
}

pub fn new_ses_rupture(rupture_id: i64, tag: &str) -> CreateSesRupture {
    CreateSesRupture {
        rupture_id,
        ses_id: 1,
        tag: tag.to_string(),
        seed: 42,
    }
}

/// A probabilistic rupture plus one event set occurrence of it.
pub async fn create_ses_rupture(
    pool: &PgPool,
    tag: &str,
    site_indices: Option<Vec<i32>>,
) -> (ProbabilisticRupture, SesRupture) {
    let rupture = ProbabilisticRuptureRepo::create(pool, &new_rupture(site_indices))
        .await
        .unwrap();
    let ses_rupture = SesRuptureRepo::create(pool, &new_ses_rupture(rupture.id, tag))
        .await
        .unwrap();
    (rupture, ses_rupture)
}

pub async fn create_gmf(pool: &PgPool, name: &str) -> Gmf {
    GmfRepo::create(
        pool,
        &CreateGmf {
            display_name: name.to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn imt(pool: &PgPool, imt_str: &str) -> IntensityMeasureType {
    let imt: Imt = imt_str.parse().unwrap();
    ImtRepo::find_or_create(pool, &imt).await.unwrap()
}

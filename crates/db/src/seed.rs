//! Insert-if-absent seeding of reference data.

use hzrdr_core::imt::SEED_IMTS;
use sqlx::PgPool;

/// Ensure every seed IMT exists. Returns the number of rows inserted, so a
/// second run on the same database returns 0.
pub async fn seed_imts(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0;
    for seed in SEED_IMTS {
        let result = sqlx::query(
            "INSERT INTO hzrdr.imt (imt_str, im_type, sa_period, sa_damping)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT DO NOTHING",
        )
        .bind(seed.imt_str)
        .bind(seed.im_type)
        .bind(seed.sa_period)
        .bind(seed.sa_damping)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }
    tx.commit().await?;

    tracing::info!(inserted, total = SEED_IMTS.len(), "Seeded intensity measure types");
    Ok(inserted)
}

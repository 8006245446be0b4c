//! Post-migration check of the hazard results storage contract.
//!
//! Reads the catalog and reports every deviation instead of stopping at
//! the first one.

use std::collections::BTreeSet;

use hzrdr_core::imt::SEED_IMTS;
use serde::Serialize;
use sqlx::PgPool;

use crate::JOB_INIT_ROLE;

/// Tables that must reference-cascade into `hzrdr.gmf_rupture`.
const GMF_RUPTURE_PARENTS: [&str; 3] = ["hzrdr.gmf", "hzrdr.imt", "hzrdr.ses_rupture"];

/// Presence-rule CHECK constraints on `hzrdr.imt`.
const IMT_CHECKS: [&str; 2] = ["imt_sa_period", "imt_sa_damping"];

/// NULL-safe unique index over `(im_type, sa_period, sa_damping)`.
const IMT_UNIQUE_INDEX: &str = "uq_imt_type_period_damping";

/// Tables the restricted principal may read and insert into, with their sequences.
const RESTRICTED_TABLES: [(&str, &str); 2] = [
    ("hzrdr.imt", "hzrdr.imt_id_seq"),
    ("hzrdr.gmf_rupture", "hzrdr.gmf_rupture_id_seq"),
];

/// Outcome of [`verify_schema`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaReport {
    pub problems: Vec<String>,
}

impl SchemaReport {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }

    fn fail(&mut self, problem: impl Into<String>) {
        self.problems.push(problem.into());
    }
}

/// Check the schema against the post-migration contract.
pub async fn verify_schema(pool: &PgPool) -> Result<SchemaReport, sqlx::Error> {
    let mut report = SchemaReport::default();

    for table in ["hzrdr.imt", "hzrdr.gmf_rupture"] {
        if !relation_exists(pool, table).await? {
            report.fail(format!("{table} is missing"));
        }
    }
    if relation_exists(pool, "hzrdr.gmf_data").await? {
        report.fail("legacy table hzrdr.gmf_data still exists");
    }
    if !report.is_ok() {
        return Ok(report);
    }

    check_site_indices_column(pool, &mut report).await?;
    check_cascades(pool, &mut report).await?;
    check_imt_constraints(pool, &mut report).await?;
    check_imt_rows(pool, &mut report).await?;
    check_privileges(pool, &mut report).await?;

    if report.is_ok() {
        tracing::info!("Schema verification passed");
    } else {
        tracing::warn!(problems = report.problems.len(), "Schema verification failed");
    }
    Ok(report)
}

async fn relation_exists(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
        .bind(name)
        .fetch_one(pool)
        .await
}

async fn check_site_indices_column(
    pool: &PgPool,
    report: &mut SchemaReport,
) -> Result<(), sqlx::Error> {
    let column: Option<(String, String)> = sqlx::query_as(
        "SELECT udt_name::text, is_nullable::text
         FROM information_schema.columns
         WHERE table_schema = 'hzrdr'
           AND table_name = 'probabilistic_rupture'
           AND column_name = 'site_indices'",
    )
    .fetch_optional(pool)
    .await?;

    match column {
        None => report.fail("hzrdr.probabilistic_rupture.site_indices is missing"),
        Some((udt, nullable)) => {
            if udt != "_int4" {
                report.fail(format!(
                    "hzrdr.probabilistic_rupture.site_indices should be INTEGER[], got {udt}"
                ));
            }
            if nullable != "YES" {
                report.fail("hzrdr.probabilistic_rupture.site_indices should be nullable");
            }
        }
    }
    Ok(())
}

async fn check_cascades(pool: &PgPool, report: &mut SchemaReport) -> Result<(), sqlx::Error> {
    let parents: Vec<(String,)> = sqlx::query_as(
        "SELECT confrelid::regclass::text
         FROM pg_constraint
         WHERE conrelid = to_regclass('hzrdr.gmf_rupture')
           AND contype = 'f'
           AND confdeltype = 'c'",
    )
    .fetch_all(pool)
    .await?;

    let found: BTreeSet<String> = parents.into_iter().map(|(name,)| name).collect();
    for parent in GMF_RUPTURE_PARENTS {
        if !found.contains(parent) {
            report.fail(format!(
                "hzrdr.gmf_rupture has no ON DELETE CASCADE foreign key to {parent}"
            ));
        }
    }
    Ok(())
}

async fn check_imt_constraints(
    pool: &PgPool,
    report: &mut SchemaReport,
) -> Result<(), sqlx::Error> {
    let checks: Vec<(String,)> = sqlx::query_as(
        "SELECT conname::text
         FROM pg_constraint
         WHERE conrelid = to_regclass('hzrdr.imt')
           AND contype = 'c'",
    )
    .fetch_all(pool)
    .await?;
    let found: BTreeSet<String> = checks.into_iter().map(|(name,)| name).collect();
    for check in IMT_CHECKS {
        if !found.contains(check) {
            report.fail(format!("hzrdr.imt is missing CHECK constraint {check}"));
        }
    }

    let unique_index: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT 1 FROM pg_index i
            WHERE i.indexrelid = to_regclass('hzrdr.' || $1)
              AND i.indrelid = to_regclass('hzrdr.imt')
              AND i.indisunique
        )",
    )
    .bind(IMT_UNIQUE_INDEX)
    .fetch_one(pool)
    .await?;
    if !unique_index {
        report.fail(format!("hzrdr.imt is missing unique index {IMT_UNIQUE_INDEX}"));
    }
    Ok(())
}

async fn check_imt_rows(pool: &PgPool, report: &mut SchemaReport) -> Result<(), sqlx::Error> {
    let violations: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM hzrdr.imt
         WHERE CASE WHEN im_type = 'SA'
                    THEN sa_period IS NULL OR sa_damping IS NULL
                    ELSE sa_period IS NOT NULL OR sa_damping IS NOT NULL
               END",
    )
    .fetch_one(pool)
    .await?;
    if violations > 0 {
        report.fail(format!(
            "{violations} hzrdr.imt rows break the SA period/damping presence rule"
        ));
    }

    let duplicates: Vec<(String, Option<f64>, Option<f64>, i64)> = sqlx::query_as(
        "SELECT im_type, sa_period, sa_damping, COUNT(*)
         FROM hzrdr.imt
         GROUP BY im_type, sa_period, sa_damping
         HAVING COUNT(*) > 1
         ORDER BY im_type, sa_period, sa_damping",
    )
    .fetch_all(pool)
    .await?;
    for (im_type, period, damping, count) in duplicates {
        report.fail(format!(
            "{count} hzrdr.imt rows share im_type {im_type}, sa_period {period:?}, sa_damping {damping:?}"
        ));
    }

    for seed in SEED_IMTS {
        let present: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM hzrdr.imt
                WHERE im_type = $1
                  AND sa_period IS NOT DISTINCT FROM $2
                  AND sa_damping IS NOT DISTINCT FROM $3
            )",
        )
        .bind(seed.im_type)
        .bind(seed.sa_period)
        .bind(seed.sa_damping)
        .fetch_one(pool)
        .await?;
        if !present {
            report.fail(format!("seed intensity measure type {} is missing", seed.imt_str));
        }
    }
    Ok(())
}

async fn check_privileges(pool: &PgPool, report: &mut SchemaReport) -> Result<(), sqlx::Error> {
    let role_exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_roles WHERE rolname = $1)")
            .bind(JOB_INIT_ROLE)
            .fetch_one(pool)
            .await?;
    if !role_exists {
        report.fail(format!("role {JOB_INIT_ROLE} does not exist"));
        return Ok(());
    }

    for (table, sequence) in RESTRICTED_TABLES {
        let (select, insert, update, delete, next_value): (bool, bool, bool, bool, bool) =
            sqlx::query_as(
                "SELECT has_table_privilege($1, $2, 'SELECT'),
                        has_table_privilege($1, $2, 'INSERT'),
                        has_table_privilege($1, $2, 'UPDATE'),
                        has_table_privilege($1, $2, 'DELETE'),
                        has_sequence_privilege($1, $3, 'USAGE')",
            )
            .bind(JOB_INIT_ROLE)
            .bind(table)
            .bind(sequence)
            .fetch_one(pool)
            .await?;

        if !select || !insert {
            report.fail(format!("{JOB_INIT_ROLE} must be able to SELECT and INSERT on {table}"));
        }
        if update || delete {
            report.fail(format!("{JOB_INIT_ROLE} must not UPDATE or DELETE on {table}"));
        }
        if !next_value {
            report.fail(format!("{JOB_INIT_ROLE} lacks USAGE on {sequence}"));
        }
    }
    Ok(())
}

//! Subcommand implementations. Each takes an open pool and reports through
//! `tracing`, printing only the requested output to stdout.

use anyhow::{bail, Context, Result};
use hzrdr_db::DbPool;

use crate::cli::StatusArgs;

pub async fn run(pool: &DbPool) -> Result<()> {
    hzrdr_db::run_migrations(pool)
        .await
        .context("Failed to run database migrations")
}

pub async fn status(pool: &DbPool, args: &StatusArgs) -> Result<()> {
    let migrations = hzrdr_db::migrations::status(pool)
        .await
        .context("Failed to read migration status")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&migrations)?);
        return Ok(());
    }

    for m in &migrations {
        let state = match m.installed_on {
            Some(at) if m.applied => format!("applied {}", at.format("%Y-%m-%d %H:%M:%S")),
            Some(_) => "failed".to_string(),
            None => "pending".to_string(),
        };
        println!("{:<16} {:<24} {}", m.version, state, m.description);
    }
    Ok(())
}

pub async fn seed(pool: &DbPool) -> Result<()> {
    let inserted = hzrdr_db::seed::seed_imts(pool)
        .await
        .context("Failed to seed intensity measure types")?;
    println!("{inserted} intensity measure types inserted");
    Ok(())
}

pub async fn verify(pool: &DbPool) -> Result<()> {
    let report = hzrdr_db::verify::verify_schema(pool)
        .await
        .context("Failed to inspect schema")?;
    if report.is_ok() {
        println!("schema OK");
        return Ok(());
    }
    for problem in &report.problems {
        println!("FAIL {problem}");
    }
    bail!("schema verification found {} problem(s)", report.problems.len())
}

//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// Apply and inspect the hazard results schema migrations.
///
/// Connection settings come from the environment (`DATABASE_URL`,
/// `DB_MAX_CONNECTIONS`, `DB_ACQUIRE_TIMEOUT_SECS`), optionally via `.env`.
#[derive(Parser, Debug)]
#[command(name = "hzrdr-migrate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute (default: run)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply all pending migrations
    Run,

    /// List known migrations and whether they are applied
    Status(StatusArgs),

    /// Insert any missing seed intensity measure types
    Seed,

    /// Check the migrated schema against the storage contract
    Verify,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_args() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["hzrdr-migrate"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn status_accepts_json_flag() {
        let cli = Cli::try_parse_from(["hzrdr-migrate", "status", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Status(args)) => assert!(args.json),
            other => panic!("expected status, got {other:?}"),
        }
    }
}

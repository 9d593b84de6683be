//! CLI module for the Conduit API
//!
//! - `serve`: run the HTTP server
//! - `migrate`: apply (or revert) PostgreSQL schema migrations and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Conduit API - RealWorld blogging backend
#[derive(Parser)]
#[command(name = "conduit-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Apply PostgreSQL migrations and exit
    Migrate(migrate::MigrateArgs),
}

/// Load `.env`, read configuration and install the log subscriber
pub(crate) fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load();
    let loaded = config.is_ok();
    let config = config.unwrap_or_default();

    logging::init_logging(&config.logging);

    if !loaded {
        tracing::warn!("Failed to load configuration, using defaults");
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["conduit-api", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }

    #[test]
    fn test_parse_migrate() {
        let cli = Cli::try_parse_from(["conduit-api", "migrate"]).unwrap();
        assert!(matches!(cli.command, Command::Migrate(args) if !args.revert));

        let cli = Cli::try_parse_from(["conduit-api", "migrate", "--revert"]).unwrap();
        assert!(matches!(cli.command, Command::Migrate(args) if args.revert));
    }

    #[test]
    fn test_unknown_command() {
        assert!(Cli::try_parse_from(["conduit-api", "ui"]).is_err());
    }
}

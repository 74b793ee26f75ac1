//! CLI module for the todo cache API
//!
//! Provides subcommands for:
//! - `serve`: run the HTTP API (default)
//! - `migrate`: apply pending PostgreSQL schema migrations
//! - `clear-cache`: drop every cached todo entry

pub mod cache;
pub mod migrate;
pub mod serve;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;

/// Todo API with a look-aside cache in front of the database
#[derive(Parser)]
#[command(name = "todo-cache-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API server (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Remove every entry from the configured cache and exit
    ClearCache,
}

/// Loads `.env`, the layered configuration and the log subscriber
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_logging(&config.logging)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["todo-cache-api", "migrate"]).unwrap();
        assert_eq!(cli.command, Some(Command::Migrate));

        let cli = Cli::try_parse_from(["todo-cache-api", "clear-cache"]).unwrap();
        assert_eq!(cli.command, Some(Command::ClearCache));
    }

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["todo-cache-api"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["todo-cache-api", "ui"]).is_err());
    }
}

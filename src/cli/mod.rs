//! CLI module for the workforce API
//!
//! Provides subcommands for running and administering the service:
//! - `serve`: HTTP server (default)
//! - `migrate`: apply database migrations and exit
//! - `create-user`: provision a login user

pub mod migrate;
pub mod serve;
pub mod user;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Workforce API - department and employee directory service
#[derive(Parser)]
#[command(name = "workforce-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Apply database migrations and exit
    Migrate,

    /// Create a user able to log in
    CreateUser(user::CreateUserArgs),
}

/// Loads `.env` and the layered configuration, then installs logging
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["workforce-api"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_create_user() {
        let cli = Cli::try_parse_from([
            "workforce-api",
            "create-user",
            "--username",
            "alice",
            "--password",
            "secret-password",
        ])
        .unwrap();

        match cli.command {
            Some(Command::CreateUser(args)) => {
                assert_eq!(args.username, "alice");
                assert_eq!(args.password, "secret-password");
            }
            _ => panic!("expected create-user"),
        }
    }

    #[test]
    fn test_parse_migrate() {
        let cli = Cli::try_parse_from(["workforce-api", "migrate"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Migrate)));
    }
}

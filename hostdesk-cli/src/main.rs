//! # hostdesk
//!
//! Operator CLI over the provider client factory. Configuration comes from the
//! process environment, optionally seeded from a `.env` file.
//!
//! ## Commands
//!
//! - `hostdesk providers` - list providers and the keys they read
//! - `hostdesk registration check|balance|lookup|price` - OpenSRS reseller API
//! - `hostdesk email check|domain|user` - OpenSRS Email (OMA) API
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;

use commands::{EmailCommand, RegistrationCommand};

/// Query domain registration and email hosting providers
#[derive(Parser)]
#[command(name = "hostdesk")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` wins when set
    #[arg(long, global = true, env = "HOSTDESK_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Load environment variables from this file instead of `./.env`
    #[arg(long, global = true, value_name = "FILE")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print metadata for all compiled-in providers
    Providers,

    /// Domain registration (OpenSRS)
    #[command(name = "registration")]
    Registration {
        #[command(subcommand)]
        command: RegistrationCommand,
    },

    /// Email hosting (OpenSRS Email)
    #[command(name = "email")]
    Email {
        #[command(subcommand)]
        command: EmailCommand,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    load_env_file(cli.env_file.as_deref())?;

    let output = match cli.command {
        Commands::Providers => serde_json::to_value(hostdesk_provider::get_all_provider_metadata())?,
        Commands::Registration { command } => commands::registration::handle_command(command).await?,
        Commands::Email { command } => commands::email::handle_command(command).await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Seed the process environment. Variables already set are not overwritten.
fn load_env_file(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
            tracing::debug!("Loaded environment from {}", path.display());
        }
        None => match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e).context("Failed to load .env"),
        },
    }
    Ok(())
}

/// Initialize tracing to stderr (stdout carries the JSON result)
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_price_with_period() {
        let cli = Cli::try_parse_from([
            "hostdesk",
            "--log-level",
            "debug",
            "registration",
            "price",
            "example.com",
            "--period",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(
            cli.command,
            Commands::Registration {
                command: RegistrationCommand::Price { ref domain, period: 3 }
            } if domain == "example.com"
        ));
    }

    #[test]
    fn price_period_defaults_to_one_year() {
        let cli = Cli::try_parse_from(["hostdesk", "registration", "price", "example.com"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Registration {
                command: RegistrationCommand::Price { period: 1, .. }
            }
        ));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "hostdesk",
            "email",
            "user",
            "bob@example.com",
            "--env-file",
            "prod.env",
        ])
        .unwrap();
        assert_eq!(cli.env_file.as_deref(), Some(std::path::Path::new("prod.env")));
    }
}

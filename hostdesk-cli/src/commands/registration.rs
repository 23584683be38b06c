use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::Value;

use hostdesk_provider::{RegistrationProvider, registration_client_from_env};

use super::CheckReport;

#[derive(Subcommand)]
pub enum RegistrationCommand {
    /// Verify the reseller credentials
    Check,

    /// Show the reseller account balance
    Balance,

    /// Check whether a domain can be registered
    Lookup {
        /// Domain name
        domain: String,
    },

    /// Registration price of a domain
    Price {
        /// Domain name
        domain: String,

        /// Registration period in years (1-10)
        #[arg(long, default_value_t = 1)]
        period: u32,
    },
}

pub async fn handle_command(command: RegistrationCommand) -> Result<Value> {
    let client = registration_client_from_env().context("Failed to create registration client")?;
    tracing::info!(
        "Using {} ({}) at {}",
        client.id(),
        client.environment(),
        client.endpoint()
    );

    let value = match command {
        RegistrationCommand::Check => {
            let valid = client
                .validate_credentials()
                .await
                .context("Credential check failed")?;
            serde_json::to_value(CheckReport {
                provider: client.id(),
                environment: client.environment(),
                endpoint: client.endpoint().to_string(),
                valid,
            })?
        }
        RegistrationCommand::Balance => {
            serde_json::to_value(client.get_balance().await.context("GET_BALANCE failed")?)?
        }
        RegistrationCommand::Lookup { domain } => serde_json::to_value(
            client
                .lookup_domain(&domain)
                .await
                .with_context(|| format!("Lookup of {domain} failed"))?,
        )?,
        RegistrationCommand::Price { domain, period } => serde_json::to_value(
            client
                .get_price(&domain, period)
                .await
                .with_context(|| format!("Price of {domain} failed"))?,
        )?,
    };

    Ok(value)
}

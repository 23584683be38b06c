use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::Value;

use hostdesk_provider::{EmailHostingProvider, email_hosting_client_from_env};

use super::CheckReport;

#[derive(Subcommand)]
pub enum EmailCommand {
    /// Verify the admin credentials
    Check,

    /// Show the settings of a hosted domain
    Domain {
        /// Domain name
        domain: String,
    },

    /// Show the settings of a mailbox
    User {
        /// Mailbox address
        email: String,
    },
}

pub async fn handle_command(command: EmailCommand) -> Result<Value> {
    let client =
        email_hosting_client_from_env().context("Failed to create email hosting client")?;
    tracing::info!(
        "Using {} ({}) at {}",
        client.id(),
        client.environment(),
        client.endpoint()
    );

    let value = match command {
        EmailCommand::Check => {
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
        EmailCommand::Domain { domain } => serde_json::to_value(
            client
                .get_domain(&domain)
                .await
                .with_context(|| format!("get_domain {domain} failed"))?,
        )?,
        EmailCommand::User { email } => serde_json::to_value(
            client
                .get_user(&email)
                .await
                .with_context(|| format!("get_user {email} failed"))?,
        )?,
    };

    Ok(value)
}

//! Subcommand definitions and handlers

pub mod email;
pub mod registration;

pub use email::EmailCommand;
pub use registration::RegistrationCommand;

use hostdesk_provider::ProviderEnvironment;
use serde::Serialize;

/// Result of a `check` subcommand
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub provider: &'static str,
    pub environment: ProviderEnvironment,
    pub endpoint: String,
    pub valid: bool,
}

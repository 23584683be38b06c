//! Provider factory functions and metadata.
//!
//! Construction is synchronous and performs no network I/O; every call
//! returns a freshly built handle.

use std::sync::Arc;

use crate::config::{ConfigSource, ProcessEnv};
use crate::error::ProviderError;
use crate::traits::{EmailHostingProvider, RegistrationProvider};
use crate::types::{CredentialValidationError, ProviderCredentials, ProviderMetadata, ProviderType};
#[cfg(any(feature = "opensrs", feature = "opensrs-email"))]
use crate::utils::log_sanitizer::mask_secret;

#[cfg(feature = "opensrs")]
use crate::providers::OpensrsProvider;
#[cfg(feature = "opensrs-email")]
use crate::providers::OpensrsEmailProvider;

/// Error returned by the factory functions.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    /// Configuration was missing, blank or malformed.
    #[error("invalid configuration: {0}")]
    Config(#[from] CredentialValidationError),
    /// The client could not be built (e.g. TLS backend initialisation).
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Creates a domain registration client from `config`.
///
/// Reads [`OPENSRS_API_KEY`](crate::config::OPENSRS_API_KEY),
/// [`OPENSRS_USERNAME`](crate::config::OPENSRS_USERNAME) and the optional
/// environment selector and endpoint override.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use hostdesk_provider::{create_registration_client, ProviderEnvironment, RegistrationProvider};
///
/// let config: HashMap<String, String> = [
///     ("OPENSRS_API_KEY".to_string(), "K".to_string()),
///     ("OPENSRS_USERNAME".to_string(), "U".to_string()),
/// ]
/// .into();
/// let client = create_registration_client(&config).unwrap();
/// assert_eq!(client.environment(), ProviderEnvironment::Test);
/// ```
pub fn create_registration_client(
    config: &dyn ConfigSource,
) -> Result<Arc<dyn RegistrationProvider>, FactoryError> {
    let credentials = ProviderCredentials::from_config(ProviderType::Opensrs, config)?;
    let endpoint = ProviderCredentials::endpoint_override(ProviderType::Opensrs, config)?;
    build_registration(credentials, endpoint)
}

/// Creates an email hosting client from `config`.
///
/// Reads [`OPENSRS_EMAIL_USER`](crate::config::OPENSRS_EMAIL_USER),
/// [`OPENSRS_EMAIL_PASSWORD`](crate::config::OPENSRS_EMAIL_PASSWORD),
/// [`OPENSRS_EMAIL_CLUSTER`](crate::config::OPENSRS_EMAIL_CLUSTER) and the
/// optional environment selector and endpoint override.
pub fn create_email_hosting_client(
    config: &dyn ConfigSource,
) -> Result<Arc<dyn EmailHostingProvider>, FactoryError> {
    let credentials = ProviderCredentials::from_config(ProviderType::OpensrsEmail, config)?;
    let endpoint = ProviderCredentials::endpoint_override(ProviderType::OpensrsEmail, config)?;
    build_email_hosting(credentials, endpoint)
}

/// [`create_registration_client`] reading the process environment.
pub fn registration_client_from_env() -> Result<Arc<dyn RegistrationProvider>, FactoryError> {
    create_registration_client(&ProcessEnv)
}

/// [`create_email_hosting_client`] reading the process environment.
pub fn email_hosting_client_from_env() -> Result<Arc<dyn EmailHostingProvider>, FactoryError> {
    create_email_hosting_client(&ProcessEnv)
}

/// Creates a registration client from already assembled credentials.
///
/// The default endpoint for the credentials' environment is used.
///
/// # Errors
///
/// [`FactoryError::Config`] if a required value is blank, `credentials` is not
/// a registration variant, or the provider is not compiled in.
pub fn create_registration_provider(
    credentials: ProviderCredentials,
) -> Result<Arc<dyn RegistrationProvider>, FactoryError> {
    build_registration(credentials, None)
}

/// Creates an email hosting client from already assembled credentials.
///
/// # Errors
///
/// [`FactoryError::Config`] if a required value is blank, the cluster is not
/// alphanumeric, `credentials` is not an email hosting variant, or the
/// provider is not compiled in.
pub fn create_email_hosting_provider(
    credentials: ProviderCredentials,
) -> Result<Arc<dyn EmailHostingProvider>, FactoryError> {
    build_email_hosting(credentials, None)
}

#[cfg_attr(not(feature = "opensrs"), allow(unused_variables))]
fn build_registration(
    credentials: ProviderCredentials,
    endpoint: Option<String>,
) -> Result<Arc<dyn RegistrationProvider>, FactoryError> {
    credentials.validate()?;
    match credentials {
        #[cfg(feature = "opensrs")]
        ProviderCredentials::Opensrs {
            api_key,
            reseller_username,
            environment,
        } => {
            let mut provider = OpensrsProvider::new(api_key, reseller_username, environment)?;
            if let Some(endpoint) = endpoint {
                provider = provider.with_endpoint(endpoint);
            }
            log::debug!(
                "Created registration client: provider=opensrs user={} key={} environment={} endpoint={}",
                provider.reseller_username(),
                mask_secret(provider.api_key()),
                environment,
                provider.endpoint()
            );
            Ok(Arc::new(provider))
        }
        other => Err(wrong_variant(other.provider_type(), "a registration provider").into()),
    }
}

#[cfg_attr(not(feature = "opensrs-email"), allow(unused_variables))]
fn build_email_hosting(
    credentials: ProviderCredentials,
    endpoint: Option<String>,
) -> Result<Arc<dyn EmailHostingProvider>, FactoryError> {
    credentials.validate()?;
    match credentials {
        #[cfg(feature = "opensrs-email")]
        ProviderCredentials::OpensrsEmail {
            user,
            password,
            cluster,
            environment,
        } => {
            let mut provider = OpensrsEmailProvider::new(user, password, cluster, environment)?;
            if let Some(endpoint) = endpoint {
                provider = provider.with_endpoint(endpoint);
            }
            log::debug!(
                "Created email hosting client: provider=opensrs_email user={} password={} cluster={} environment={} endpoint={}",
                provider.user(),
                mask_secret(&provider.password),
                provider.cluster(),
                environment,
                provider.endpoint()
            );
            Ok(Arc::new(provider))
        }
        other => Err(wrong_variant(other.provider_type(), "an email hosting provider").into()),
    }
}

fn wrong_variant(provider: ProviderType, expected: &str) -> CredentialValidationError {
    CredentialValidationError::InvalidFormat {
        provider,
        field: "provider".to_string(),
        label: "Provider".to_string(),
        reason: format!("'{provider}' is not {expected} or is not enabled in this build"),
    }
}

/// Returns metadata for all providers enabled via feature flags.
///
/// Useful for listing the configuration keys an operator has to set.
pub fn get_all_provider_metadata() -> Vec<ProviderMetadata> {
    vec![
        #[cfg(feature = "opensrs")]
        <OpensrsProvider as RegistrationProvider>::metadata(),
        #[cfg(feature = "opensrs-email")]
        <OpensrsEmailProvider as EmailHostingProvider>::metadata(),
    ]
}

//! # hostdesk-provider
//!
//! Client factory and API bindings for the external services a hosting
//! reseller runs on: domain registration and email hosting, both provided
//! by OpenSRS.
//!
//! ## Supported Providers
//!
//! | Provider | Capability | Feature Flag | Auth Method |
//! |----------|------------|-------------|-------------|
//! | [OpenSRS](https://opensrs.com/) | [`RegistrationProvider`] | `opensrs` | Reseller key, double-MD5 signature |
//! | [OpenSRS Email](https://opensrs.com/services/email/) | [`EmailHostingProvider`] | `opensrs-email` | Admin user + password |
//!
//! ## Feature Flags
//!
//! - **`all-providers`** *(default)*: enable both providers.
//! - **`opensrs`** / **`opensrs-email`**: enable one provider.
//! - **`native-tls`** *(default)* or **`rustls`**: TLS backend.
//!
//! ## Configuration
//!
//! The factory reads plain key/value configuration through [`ConfigSource`].
//! [`ProcessEnv`] reads the process environment; a `HashMap<String, String>`
//! can be passed directly.
//!
//! | Key | Required | Meaning |
//! |-----|----------|---------|
//! | `OPENSRS_API_KEY` | yes | Reseller API key |
//! | `OPENSRS_USERNAME` | yes | Reseller username |
//! | `OPENSRS_ENVIRONMENT` | no | `test` (default) or `live` |
//! | `OPENSRS_ENDPOINT` | no | Base URL override |
//! | `OPENSRS_EMAIL_USER` | yes | Email admin user |
//! | `OPENSRS_EMAIL_PASSWORD` | yes | Email admin password |
//! | `OPENSRS_EMAIL_CLUSTER` | yes | Cluster identifier (`a`, `b`, ...) |
//! | `OPENSRS_EMAIL_ENVIRONMENT` | no | `test` (default) or `live` |
//! | `OPENSRS_EMAIL_ENDPOINT` | no | Base URL override |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hostdesk_provider::{
//!     EmailHostingProvider, RegistrationProvider, email_hosting_client_from_env,
//!     registration_client_from_env,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registrar = registration_client_from_env()?;
//!     let availability = registrar.lookup_domain("example.com").await?;
//!     println!("{} available: {}", availability.domain, availability.available);
//!
//!     let email = email_hosting_client_from_env()?;
//!     if email.validate_credentials().await? {
//!         let domain = email.get_domain("example.com").await?;
//!         println!("{:?}", domain.attributes);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Construction fails with [`FactoryError`]; API operations return
//! [`Result<T, ProviderError>`](ProviderError). Transient errors
//! (`NetworkError`, `Timeout`, `RateLimited`) on read-only calls are retried
//! with exponential backoff; calls that change provider state and
//! construction are never retried.

pub mod config;
mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export configuration sources
pub use config::{ConfigSource, ProcessEnv};

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::{
    FactoryError, create_email_hosting_client, create_email_hosting_provider,
    create_registration_client, create_registration_provider, email_hosting_client_from_env,
    get_all_provider_metadata, registration_client_from_env,
};

// Re-export capability traits (the error mapper stays internal)
pub use traits::{EmailHostingProvider, RegistrationProvider};

// Re-export types
pub use types::{
    AccountBalance, ConfigField, CredentialValidationError, DomainAvailability, DomainPrice,
    EmailDomain, FieldType, Mailbox, ParseEnvironmentError, ProviderCredentials,
    ProviderEnvironment, ProviderMetadata, ProviderType,
};

// Re-export concrete providers (behind feature flags)
#[cfg(feature = "opensrs")]
pub use providers::OpensrsProvider;

#[cfg(feature = "opensrs-email")]
pub use providers::OpensrsEmailProvider;

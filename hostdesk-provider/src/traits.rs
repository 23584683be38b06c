use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    AccountBalance, DomainAvailability, DomainPrice, EmailDomain, Mailbox, ProviderEnvironment,
    ProviderMetadata,
};

/// Raw API error (internal use)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// Error code (format differs per provider)
    pub code: Option<String>,
    /// Original error message
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Extra information available when mapping an error (internal use)
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Domain the request was about (for `DomainNotFound` / `InvalidParameter`)
    pub domain: Option<String>,
    /// Mailbox the request was about (for `MailboxNotFound`)
    pub mailbox: Option<String>,
}

impl ErrorContext {
    pub fn domain(domain: &str) -> Self {
        Self {
            domain: Some(domain.to_string()),
            mailbox: None,
        }
    }

    pub fn mailbox(mailbox: &str) -> Self {
        Self {
            domain: None,
            mailbox: Some(mailbox.to_string()),
        }
    }
}

/// Maps raw provider errors onto [`ProviderError`] (internal use)
pub(crate) trait ProviderErrorMapper {
    /// Provider identifier
    fn provider_name(&self) -> &'static str;

    /// Map a raw API error to the unified error type
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// Shortcut: response could not be parsed
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: request body could not be built
    fn serialization_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::SerializationError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: unknown error (fallback)
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Domain registration capability.
///
/// Returned by [`create_registration_client()`](crate::create_registration_client).
/// Implement it to substitute a test double for the real registrar.
#[async_trait]
pub trait RegistrationProvider: Send + Sync {
    /// Provider identifier
    fn id(&self) -> &'static str;

    /// Environment this handle targets
    fn environment(&self) -> ProviderEnvironment;

    /// Base URL requests are sent to
    fn endpoint(&self) -> &str;

    /// Provider metadata (type level, callable before construction)
    fn metadata() -> ProviderMetadata
    where
        Self: Sized;

    /// Check the credentials against the API.
    ///
    /// Rejected credentials yield `Ok(false)`; transport failures are errors.
    async fn validate_credentials(&self) -> Result<bool>;

    /// Whether `domain` can be registered
    async fn lookup_domain(&self, domain: &str) -> Result<DomainAvailability>;

    /// Registration price of `domain` for `period` years
    async fn get_price(&self, domain: &str, period: u32) -> Result<DomainPrice>;

    /// Reseller account balance
    async fn get_balance(&self) -> Result<AccountBalance>;
}

/// Email hosting capability.
///
/// Returned by [`create_email_hosting_client()`](crate::create_email_hosting_client).
#[async_trait]
pub trait EmailHostingProvider: Send + Sync {
    /// Provider identifier
    fn id(&self) -> &'static str;

    /// Environment this handle targets
    fn environment(&self) -> ProviderEnvironment;

    /// Base URL requests are sent to
    fn endpoint(&self) -> &str;

    /// Provider metadata (type level, callable before construction)
    fn metadata() -> ProviderMetadata
    where
        Self: Sized;

    /// Check the credentials against the API.
    ///
    /// Rejected credentials yield `Ok(false)`; transport failures are errors.
    async fn validate_credentials(&self) -> Result<bool> {
        match self.authenticate().await {
            Ok(_) => Ok(true),
            Err(ProviderError::InvalidCredentials { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Open an API session and return its token
    async fn authenticate(&self) -> Result<String>;

    /// Settings of a hosted email domain
    async fn get_domain(&self, domain: &str) -> Result<EmailDomain>;

    /// Settings of a mailbox
    async fn get_user(&self, address: &str) -> Result<Mailbox>;
}

use serde::{Deserialize, Serialize};

/// Error returned by registration and email hosting calls.
///
/// Every variant names the provider (`opensrs` / `opensrs_email`) that failed.
/// The type serializes with a `code` tag so the CLI can print it as JSON.
///
/// [`NetworkError`](Self::NetworkError), [`Timeout`](Self::Timeout) and
/// [`RateLimited`](Self::RateLimited) are transient. Lookups, price checks and
/// other read-only calls are resent with backoff after them; calls that change
/// state at the provider are not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// Connection failure, or the gateway answered 502-504.
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The provided credentials are invalid or expired.
    InvalidCredentials {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// A request parameter was rejected (e.g., malformed domain name).
    InvalidParameter {
        /// Provider that produced the error.
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429 or equivalent).
    RateLimited {
        /// Provider that produced the error.
        provider: String,
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The domain is unknown to the provider (not registered here / not provisioned).
    DomainNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Domain name that was not found.
        domain: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The mailbox (email user) does not exist.
    MailboxNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Mailbox address that was not found.
        mailbox: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The authenticated user lacks permission for the requested operation.
    PermissionDenied {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// Failed to parse the provider's API response.
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// An unrecognized error from the provider API.
    ///
    /// This is a catch-all for error codes not yet mapped to a specific variant.
    Unknown {
        /// Provider that produced the error.
        provider: String,
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl ProviderError {
    /// Whether the error is an expected outcome (bad input, missing object, rejected
    /// credentials) rather than a fault. Used to pick `warn` over `error` when logging.
    ///
    /// **Keep in sync when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::InvalidParameter { .. }
                | Self::DomainNotFound { .. }
                | Self::MailboxNotFound { .. }
                | Self::PermissionDenied { .. }
        )
    }

    /// Provider that produced the error (`opensrs` or `opensrs_email`).
    #[must_use]
    pub fn provider(&self) -> &str {
        match self {
            Self::NetworkError { provider, .. }
            | Self::InvalidCredentials { provider, .. }
            | Self::InvalidParameter { provider, .. }
            | Self::RateLimited { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::DomainNotFound { provider, .. }
            | Self::MailboxNotFound { provider, .. }
            | Self::PermissionDenied { provider, .. }
            | Self::ParseError { provider, .. }
            | Self::SerializationError { provider, .. }
            | Self::Unknown { provider, .. } => provider,
        }
    }

    /// Whether resending the same read-only request may succeed. Commands are
    /// never resent regardless.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] ", self.provider())?;
        match self {
            Self::NetworkError { detail, .. } => write!(f, "Network error: {detail}"),
            Self::InvalidCredentials { raw_message, .. } => {
                with_detail(f, "Invalid credentials", raw_message.as_deref())
            }
            Self::InvalidParameter { param, detail, .. } => {
                write!(f, "Invalid parameter '{param}': {detail}")
            }
            Self::RateLimited {
                retry_after: Some(secs),
                ..
            } => write!(f, "Rate limited (retry after {secs}s)"),
            Self::RateLimited { .. } => f.write_str("Rate limited"),
            Self::Timeout { detail, .. } => write!(f, "Request timeout: {detail}"),
            Self::DomainNotFound {
                domain,
                raw_message,
                ..
            } => with_detail(
                f,
                &format!("Domain '{domain}' not found"),
                raw_message.as_deref(),
            ),
            Self::MailboxNotFound { mailbox, .. } => write!(f, "Mailbox '{mailbox}' not found"),
            Self::PermissionDenied { raw_message, .. } => {
                with_detail(f, "Permission denied", raw_message.as_deref())
            }
            Self::ParseError { detail, .. } => write!(f, "Parse error: {detail}"),
            Self::SerializationError { detail, .. } => {
                write!(f, "Serialization error: {detail}")
            }
            Self::Unknown {
                raw_code: Some(code),
                raw_message,
                ..
            } => write!(f, "{raw_message} (code {code})"),
            Self::Unknown { raw_message, .. } => f.write_str(raw_message),
        }
    }
}

/// `head`, followed by `: detail` when the provider sent one.
fn with_detail(
    f: &mut std::fmt::Formatter<'_>,
    head: &str,
    detail: Option<&str>,
) -> std::fmt::Result {
    match detail {
        Some(detail) => write!(f, "{head}: {detail}"),
        None => f.write_str(head),
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;

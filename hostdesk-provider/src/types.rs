use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{
    ConfigSource, OPENSRS_API_KEY, OPENSRS_EMAIL_CLUSTER, OPENSRS_EMAIL_ENDPOINT,
    OPENSRS_EMAIL_ENVIRONMENT, OPENSRS_EMAIL_PASSWORD, OPENSRS_EMAIL_USER, OPENSRS_ENDPOINT,
    OPENSRS_ENVIRONMENT, OPENSRS_USERNAME,
};

// ============ Provider Types ============

/// Identifies which provider implementation to use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    /// OpenSRS domain registration (XML API). Requires feature `opensrs`.
    Opensrs,
    /// OpenSRS Email Service (OMA JSON API). Requires feature `opensrs-email`.
    OpensrsEmail,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Opensrs => write!(f, "opensrs"),
            Self::OpensrsEmail => write!(f, "opensrs_email"),
        }
    }
}

// ============ Environment Selector ============

/// Which provider endpoint a client targets.
///
/// Defaults to [`Test`](Self::Test) so an unconfigured deployment can never
/// reach production by accident.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderEnvironment {
    /// Sandbox endpoint.
    #[default]
    Test,
    /// Production endpoint.
    Live,
}

impl ProviderEnvironment {
    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Live => "live",
        }
    }

    /// Returns `true` for [`Live`](Self::Live).
    pub fn is_live(self) -> bool {
        self == Self::Live
    }
}

impl std::fmt::Display for ProviderEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an environment selector is neither `test` nor `live`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment '{0}', expected 'test' or 'live'")]
pub struct ParseEnvironmentError(pub String);

impl FromStr for ProviderEnvironment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" => Ok(Self::Test),
            "live" => Ok(Self::Live),
            _ => Err(ParseEnvironmentError(s.to_string())),
        }
    }
}

// ============ Registration Results ============

/// Availability of a domain name at the registrar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DomainAvailability {
    /// Domain that was looked up.
    pub domain: String,
    /// Whether the name can be registered.
    pub available: bool,
    /// Status string as reported by the registrar (e.g. `"available"`, `"taken"`).
    pub status: String,
}

/// Registration price of a domain for a given period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DomainPrice {
    /// Domain that was priced.
    pub domain: String,
    /// Registration period in years.
    pub period: u32,
    /// Price as a decimal string, exactly as returned by the registrar.
    pub price: String,
    /// Whether the registry flags the name as premium, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
}

/// Reseller account balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    /// Available balance as a decimal string.
    pub balance: String,
    /// Funds held for pending orders, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_balance: Option<String>,
}

// ============ Email Hosting Results ============

/// An email domain provisioned on the hosting platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmailDomain {
    /// Domain name.
    pub name: String,
    /// Provider-specific settings, passed through untouched.
    pub attributes: Map<String, Value>,
}

/// A mailbox (email user) on the hosting platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Mailbox {
    /// Full mailbox address.
    pub address: String,
    /// Provider-specific settings, passed through untouched.
    pub attributes: Map<String, Value>,
}

// ============ Provider Metadata Types ============

/// The input type of a configuration field (affects masking in logs and UIs).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Plain text input.
    Text,
    /// Secret input; never logged.
    Password,
}

/// Definition of a single configuration key read by the factory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigField {
    /// Configuration key (environment variable name).
    pub key: String,
    /// Human-readable label.
    pub label: String,
    /// Input type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Value used when the key is absent, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Optional help text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

impl ConfigField {
    pub(crate) fn required(key: &str, label: &str, field_type: FieldType) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            field_type,
            default: None,
            help_text: None,
        }
    }

    pub(crate) fn optional(key: &str, label: &str, default: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            field_type: FieldType::Text,
            default: default.map(str::to_string),
            help_text: None,
        }
    }

    #[must_use]
    pub(crate) fn with_help(mut self, help: &str) -> Self {
        self.help_text = Some(help.to_string());
        self
    }
}

/// Static metadata describing a provider and the configuration it reads.
///
/// Obtain via [`RegistrationProvider::metadata()`](crate::RegistrationProvider::metadata),
/// [`EmailHostingProvider::metadata()`](crate::EmailHostingProvider::metadata) or
/// [`get_all_provider_metadata()`](crate::get_all_provider_metadata).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    /// Provider type identifier.
    pub id: ProviderType,
    /// Human-readable provider name.
    pub name: String,
    /// Short description of the provider.
    pub description: String,
    /// Keys that must be set (and non-blank) for construction to succeed.
    pub required_fields: Vec<ConfigField>,
    /// Keys that fall back to a default or are ignored when absent.
    pub optional_fields: Vec<ConfigField>,
}

// ============ Credential Types ============

/// Validation error for provider configuration.
///
/// Returned when a configuration key is missing, blank, or has an invalid format.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// A required configuration key is not set.
    MissingField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Configuration key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A required configuration key is set but blank.
    EmptyField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Configuration key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A configuration value has an invalid format.
    InvalidFormat {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Configuration key.
        field: String,
        /// Human-readable field label.
        label: String,
        /// Description of what's wrong with the format.
        reason: String,
    },
}

impl CredentialValidationError {
    /// Configuration key the error refers to.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field, .. }
            | Self::EmptyField { field, .. }
            | Self::InvalidFormat { field, .. } => field,
        }
    }
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { label, field, .. } => {
                write!(f, "Missing required field: {label} ({field})")
            }
            Self::EmptyField { label, field, .. } => {
                write!(f, "Field must not be empty: {label} ({field})")
            }
            Self::InvalidFormat { label, reason, .. } => write!(f, "{label}: {reason}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Type-safe credential container for all supported providers.
///
/// Build one with [`from_config()`](Self::from_config) and pass it to
/// [`create_registration_provider()`](crate::create_registration_provider) or
/// [`create_email_hosting_provider()`](crate::create_email_hosting_provider).
///
/// `Debug` output masks secrets.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "credentials", rename_all = "snake_case")]
pub enum ProviderCredentials {
    /// OpenSRS reseller credentials.
    Opensrs {
        /// Reseller API key (signs every request).
        api_key: String,
        /// Reseller username.
        reseller_username: String,
        /// Target environment.
        #[serde(default)]
        environment: ProviderEnvironment,
    },

    /// OpenSRS Email Service admin credentials.
    OpensrsEmail {
        /// Admin user.
        user: String,
        /// Admin password.
        password: String,
        /// Cluster identifier (`a`, `b`, ...). Ignored by the test environment.
        cluster: String,
        /// Target environment.
        #[serde(default)]
        environment: ProviderEnvironment,
    },
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Opensrs {
                reseller_username,
                environment,
                ..
            } => f
                .debug_struct("Opensrs")
                .field("api_key", &"***")
                .field("reseller_username", reseller_username)
                .field("environment", environment)
                .finish(),
            Self::OpensrsEmail {
                user,
                cluster,
                environment,
                ..
            } => f
                .debug_struct("OpensrsEmail")
                .field("user", user)
                .field("password", &"***")
                .field("cluster", cluster)
                .field("environment", environment)
                .finish(),
        }
    }
}

impl ProviderCredentials {
    /// Read and validate credentials for `provider` from a configuration source.
    ///
    /// Required values are used verbatim. An absent or blank environment selector
    /// means [`ProviderEnvironment::Test`]; any other value must be `test` or `live`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialValidationError`] if a required key is missing or blank,
    /// or a value has an invalid format.
    pub fn from_config(
        provider: ProviderType,
        source: &dyn ConfigSource,
    ) -> Result<Self, CredentialValidationError> {
        match provider {
            ProviderType::Opensrs => Ok(Self::Opensrs {
                api_key: Self::get_required_field(provider, source, OPENSRS_API_KEY, "API Key")?,
                reseller_username: Self::get_required_field(
                    provider,
                    source,
                    OPENSRS_USERNAME,
                    "Reseller Username",
                )?,
                environment: Self::get_environment(provider, source, OPENSRS_ENVIRONMENT)?,
            }),
            ProviderType::OpensrsEmail => {
                let user = Self::get_required_field(provider, source, OPENSRS_EMAIL_USER, "User")?;
                let password =
                    Self::get_required_field(provider, source, OPENSRS_EMAIL_PASSWORD, "Password")?;
                let cluster =
                    Self::get_required_field(provider, source, OPENSRS_EMAIL_CLUSTER, "Cluster")?;
                check_cluster(&cluster)?;
                Ok(Self::OpensrsEmail {
                    user,
                    password,
                    cluster,
                    environment: Self::get_environment(provider, source, OPENSRS_EMAIL_ENVIRONMENT)?,
                })
            }
        }
    }

    /// Build credentials from a key/value map keyed like the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`from_config()`](Self::from_config).
    pub fn from_map(
        provider: ProviderType,
        map: &HashMap<String, String>,
    ) -> Result<Self, CredentialValidationError> {
        Self::from_config(provider, map)
    }

    /// Convert back to the key/value form read by [`from_map()`](Self::from_map).
    pub fn to_map(&self) -> HashMap<String, String> {
        let pairs: Vec<(&str, &str)> = match self {
            Self::Opensrs {
                api_key,
                reseller_username,
                environment,
            } => vec![
                (OPENSRS_API_KEY, api_key.as_str()),
                (OPENSRS_USERNAME, reseller_username.as_str()),
                (OPENSRS_ENVIRONMENT, environment.as_str()),
            ],
            Self::OpensrsEmail {
                user,
                password,
                cluster,
                environment,
            } => vec![
                (OPENSRS_EMAIL_USER, user.as_str()),
                (OPENSRS_EMAIL_PASSWORD, password.as_str()),
                (OPENSRS_EMAIL_CLUSTER, cluster.as_str()),
                (OPENSRS_EMAIL_ENVIRONMENT, environment.as_str()),
            ],
        };
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Check the rules [`from_config()`](Self::from_config) enforces on values
    /// that were built some other way (deserialized or constructed directly).
    ///
    /// # Errors
    ///
    /// [`CredentialValidationError::EmptyField`] for a blank required value,
    /// [`CredentialValidationError::InvalidFormat`] for a malformed cluster.
    pub fn validate(&self) -> Result<(), CredentialValidationError> {
        let provider = self.provider_type();
        let non_blank = |key: &str, label: &str, value: &str| {
            if value.trim().is_empty() {
                Err(CredentialValidationError::EmptyField {
                    provider,
                    field: key.to_string(),
                    label: label.to_string(),
                })
            } else {
                Ok(())
            }
        };
        match self {
            Self::Opensrs {
                api_key,
                reseller_username,
                ..
            } => {
                non_blank(OPENSRS_API_KEY, "API Key", api_key)?;
                non_blank(OPENSRS_USERNAME, "Reseller Username", reseller_username)
            }
            Self::OpensrsEmail {
                user,
                password,
                cluster,
                ..
            } => {
                non_blank(OPENSRS_EMAIL_USER, "User", user)?;
                non_blank(OPENSRS_EMAIL_PASSWORD, "Password", password)?;
                non_blank(OPENSRS_EMAIL_CLUSTER, "Cluster", cluster)?;
                check_cluster(cluster)
            }
        }
    }

    /// Obtain a required field and verify that it is not blank
    fn get_required_field(
        provider: ProviderType,
        source: &dyn ConfigSource,
        key: &str,
        label: &str,
    ) -> Result<String, CredentialValidationError> {
        match source.get(key) {
            None => Err(CredentialValidationError::MissingField {
                provider,
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) if v.trim().is_empty() => Err(CredentialValidationError::EmptyField {
                provider,
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) => Ok(v),
        }
    }

    fn get_environment(
        provider: ProviderType,
        source: &dyn ConfigSource,
        key: &str,
    ) -> Result<ProviderEnvironment, CredentialValidationError> {
        match source.get_non_blank(key) {
            None => Ok(ProviderEnvironment::default()),
            Some(v) => v
                .parse()
                .map_err(|e: ParseEnvironmentError| CredentialValidationError::InvalidFormat {
                    provider,
                    field: key.to_string(),
                    label: "Environment".to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Read the optional base URL override for `provider`.
    ///
    /// Blank values count as unset. A trailing `/` is removed.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialValidationError::InvalidFormat`] if the value is not an
    /// `http://` or `https://` URL.
    pub fn endpoint_override(
        provider: ProviderType,
        source: &dyn ConfigSource,
    ) -> Result<Option<String>, CredentialValidationError> {
        let key = match provider {
            ProviderType::Opensrs => OPENSRS_ENDPOINT,
            ProviderType::OpensrsEmail => OPENSRS_EMAIL_ENDPOINT,
        };
        let Some(url) = source.get_non_blank(key) else {
            return Ok(None);
        };
        let url = url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(CredentialValidationError::InvalidFormat {
                provider,
                field: key.to_string(),
                label: "Endpoint".to_string(),
                reason: format!("'{url}' is not an http(s) URL"),
            });
        }
        Ok(Some(url.trim_end_matches('/').to_string()))
    }

    /// Returns the [`ProviderType`] corresponding to this credential variant.
    pub fn provider_type(&self) -> ProviderType {
        match self {
            Self::Opensrs { .. } => ProviderType::Opensrs,
            Self::OpensrsEmail { .. } => ProviderType::OpensrsEmail,
        }
    }

    /// Target environment of these credentials.
    pub fn environment(&self) -> ProviderEnvironment {
        match self {
            Self::Opensrs { environment, .. } | Self::OpensrsEmail { environment, .. } => {
                *environment
            }
        }
    }
}

/// The cluster becomes a hostname label of the live endpoint.
fn check_cluster(cluster: &str) -> Result<(), CredentialValidationError> {
    if cluster.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Ok(());
    }
    Err(CredentialValidationError::InvalidFormat {
        provider: ProviderType::OpensrsEmail,
        field: OPENSRS_EMAIL_CLUSTER.to_string(),
        label: "Cluster".to_string(),
        reason: format!("cluster '{cluster}' must be ASCII letters or digits"),
    })
}

//! OpenSRS domain registration provider (XML API)

mod envelope;
mod error;
mod http;
mod provider;
mod sign;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::create_http_client;
use crate::types::ProviderEnvironment;
use crate::utils::log_sanitizer::mask_secret;

pub(crate) use envelope::{OpsRequest, OpsResponse};

/// Sandbox endpoint
pub(crate) const OPENSRS_TEST_ENDPOINT: &str = "https://horizon.opensrs.net:55443";
/// Production endpoint
pub(crate) const OPENSRS_LIVE_ENDPOINT: &str = "https://rr-n1-tor.opensrs.net:55443";

/// OpenSRS domain registration provider
pub struct OpensrsProvider {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) reseller_username: String,
    pub(crate) environment: ProviderEnvironment,
    pub(crate) endpoint: String,
}

impl OpensrsProvider {
    /// Create a client for `environment`. No request is made.
    pub fn new(
        api_key: String,
        reseller_username: String,
        environment: ProviderEnvironment,
    ) -> Result<Self> {
        Ok(Self {
            client: create_http_client("opensrs")?,
            api_key,
            reseller_username,
            environment,
            endpoint: Self::default_endpoint(environment).to_string(),
        })
    }

    /// Send requests to `endpoint` instead of the environment default.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Endpoint used for `environment` when no override is given.
    pub fn default_endpoint(environment: ProviderEnvironment) -> &'static str {
        match environment {
            ProviderEnvironment::Test => OPENSRS_TEST_ENDPOINT,
            ProviderEnvironment::Live => OPENSRS_LIVE_ENDPOINT,
        }
    }

    /// Reseller username sent with every request.
    pub fn reseller_username(&self) -> &str {
        &self.reseller_username
    }

    /// API key used to sign requests.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for OpensrsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpensrsProvider")
            .field("reseller_username", &self.reseller_username)
            .field("api_key", &mask_secret(&self.api_key))
            .field("environment", &self.environment)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

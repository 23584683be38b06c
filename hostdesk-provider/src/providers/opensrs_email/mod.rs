//! OpenSRS Email Service provider (OMA JSON API)

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::error::{ProviderError, Result};
use crate::providers::common::create_http_client;
use crate::types::ProviderEnvironment;
use crate::utils::log_sanitizer::mask_secret;

pub(crate) use types::{OmaCredentials, OmaRequest, OmaResponse};

/// Sandbox endpoint (single shared cluster)
pub(crate) const OMA_TEST_ENDPOINT: &str = "https://admin.test.hostedemail.com";

/// OpenSRS Email Service provider
pub struct OpensrsEmailProvider {
    pub(crate) client: Client,
    pub(crate) user: String,
    pub(crate) password: String,
    pub(crate) cluster: String,
    pub(crate) environment: ProviderEnvironment,
    pub(crate) endpoint: String,
}

impl OpensrsEmailProvider {
    /// Create a client for `cluster` in `environment`. No request is made.
    ///
    /// # Errors
    ///
    /// [`ProviderError::InvalidParameter`] if `cluster` is not ASCII letters or
    /// digits, since it becomes part of the live hostname.
    pub fn new(
        user: String,
        password: String,
        cluster: String,
        environment: ProviderEnvironment,
    ) -> Result<Self> {
        if cluster.is_empty() || !cluster.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ProviderError::InvalidParameter {
                provider: "opensrs_email".to_string(),
                param: "cluster".to_string(),
                detail: format!("cluster '{cluster}' must be ASCII letters or digits"),
            });
        }
        let endpoint = Self::default_endpoint(environment, &cluster);
        Ok(Self {
            client: create_http_client("opensrs_email")?,
            user,
            password,
            cluster,
            environment,
            endpoint,
        })
    }

    /// Send requests to `endpoint` instead of the environment default.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Endpoint used for `environment` and `cluster` when no override is given.
    ///
    /// The test environment has one cluster, so `cluster` only affects live.
    pub fn default_endpoint(environment: ProviderEnvironment, cluster: &str) -> String {
        match environment {
            ProviderEnvironment::Test => OMA_TEST_ENDPOINT.to_string(),
            ProviderEnvironment::Live => format!(
                "https://admin.{}.hostedemail.com",
                cluster.to_ascii_lowercase()
            ),
        }
    }

    /// Admin user sent with every request.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Cluster identifier as configured.
    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    pub(crate) fn credentials(&self) -> OmaCredentials<'_> {
        OmaCredentials {
            user: &self.user,
            password: &self.password,
        }
    }
}

impl std::fmt::Debug for OpensrsEmailProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpensrsEmailProvider")
            .field("user", &self.user)
            .field("password", &mask_secret(&self.password))
            .field("cluster", &self.cluster)
            .field("environment", &self.environment)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

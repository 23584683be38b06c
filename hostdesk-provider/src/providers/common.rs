//! Helpers shared by provider implementations

use std::time::Duration;

use reqwest::Client;

use crate::error::{ProviderError, Result};

// ============ HTTP Client ============

/// Connect timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Request timeout (seconds)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Build an HTTP client with timeouts.
///
/// Building only assembles configuration; no connection is opened.
pub fn create_http_client(provider: &str) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .user_agent(concat!("hostdesk-provider/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("failed to build HTTP client: {e}"),
        })
}

// ============ Domain names ============

/// Lowercase and strip the trailing dot.
pub fn normalize_domain_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Normalize a domain argument, rejecting empty input before it reaches the API.
pub fn require_domain(name: &str, provider: &str) -> Result<String> {
    let domain = normalize_domain_name(name);
    if domain.is_empty() {
        return Err(ProviderError::InvalidParameter {
            provider: provider.to_string(),
            param: "domain".to_string(),
            detail: "domain name must not be empty".to_string(),
        });
    }
    Ok(domain)
}

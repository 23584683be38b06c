//! OpenSRS registration integration tests (sandbox)
//!
//! Run with:
//! ```bash
//! OPENSRS_API_KEY=xxx OPENSRS_USERNAME=xxx TEST_DOMAIN=example.com \
//!     cargo test -p hostdesk-provider --test opensrs_test -- --ignored --nocapture --test-threads=1
//! ```

mod common;

use std::collections::HashMap;

use hostdesk_provider::config::{OPENSRS_API_KEY, OPENSRS_ENVIRONMENT};
use hostdesk_provider::{
    ProcessEnv, ProviderEnvironment, RegistrationProvider, create_registration_client,
};

/// Environment named by `OPENSRS_ENVIRONMENT`; unset or blank means test.
fn configured_environment() -> ProviderEnvironment {
    match std::env::var(OPENSRS_ENVIRONMENT) {
        Ok(v) if !v.trim().is_empty() => v
            .parse()
            .unwrap_or_else(|e| panic!("{OPENSRS_ENVIRONMENT}: {e}")),
        _ => ProviderEnvironment::Test,
    }
}

#[tokio::test]
#[ignore = "integration test: requires OPENSRS_API_KEY and OPENSRS_USERNAME"]
async fn test_opensrs_validate_credentials() {
    skip_if_no_credentials!("OPENSRS_API_KEY", "OPENSRS_USERNAME");

    let client = require_ok!(create_registration_client(&ProcessEnv), "factory failed");
    assert_eq!(client.environment(), configured_environment());

    let valid = require_ok!(
        client.validate_credentials().await,
        "validate_credentials failed"
    );
    assert!(valid, "credentials should be accepted");

    println!("validate_credentials ok");
}

#[tokio::test]
#[ignore = "integration test: requires OPENSRS_API_KEY and OPENSRS_USERNAME"]
async fn test_opensrs_wrong_key_is_rejected() {
    skip_if_no_credentials!("OPENSRS_API_KEY", "OPENSRS_USERNAME");

    let mut config: HashMap<String, String> = ["OPENSRS_USERNAME"]
        .iter()
        .filter_map(|k| std::env::var(k).ok().map(|v| ((*k).to_string(), v)))
        .collect();
    config.insert(OPENSRS_API_KEY.to_string(), "0".repeat(64));

    let client = require_ok!(create_registration_client(&config), "factory failed");
    let valid = require_ok!(
        client.validate_credentials().await,
        "validate_credentials failed"
    );
    assert!(!valid, "a made-up key must not validate");
}

#[tokio::test]
#[ignore = "integration test: requires OPENSRS_API_KEY, OPENSRS_USERNAME and TEST_DOMAIN"]
async fn test_opensrs_lookup_and_price() {
    skip_if_no_credentials!("OPENSRS_API_KEY", "OPENSRS_USERNAME", "TEST_DOMAIN");

    let domain = std::env::var("TEST_DOMAIN").unwrap_or_default();
    let client = require_ok!(create_registration_client(&ProcessEnv), "factory failed");

    let availability = require_ok!(client.lookup_domain(&domain).await, "lookup failed");
    println!(
        "lookup ok: {} available={} status={}",
        availability.domain, availability.available, availability.status
    );

    let price = require_ok!(client.get_price(&domain, 1).await, "get_price failed");
    assert!(!price.price.is_empty());
    println!("get_price ok: {} for {} year(s)", price.price, price.period);
}

#[tokio::test]
#[ignore = "integration test: requires OPENSRS_API_KEY and OPENSRS_USERNAME"]
async fn test_opensrs_get_balance() {
    skip_if_no_credentials!("OPENSRS_API_KEY", "OPENSRS_USERNAME");

    let client = require_ok!(create_registration_client(&ProcessEnv), "factory failed");
    let balance = require_ok!(client.get_balance().await, "get_balance failed");
    println!("get_balance ok: {}", balance.balance);
}

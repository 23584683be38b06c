//! Factory-built clients against a local mock server
//!
//! ```bash
//! cargo test -p hostdesk-provider --test factory_test
//! ```

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{config, ops_failure, ops_reply};
use hostdesk_provider::config::{
    OPENSRS_API_KEY, OPENSRS_EMAIL_CLUSTER, OPENSRS_EMAIL_ENDPOINT, OPENSRS_EMAIL_PASSWORD,
    OPENSRS_EMAIL_USER, OPENSRS_ENDPOINT, OPENSRS_USERNAME,
};
use hostdesk_provider::{
    AccountBalance, DomainAvailability, DomainPrice, EmailHostingProvider, ProviderEnvironment,
    ProviderError, ProviderMetadata, ProviderType, RegistrationProvider,
    create_email_hosting_client, create_registration_client,
};
use md5::{Digest, Md5};
use mockito::Matcher;

fn registrar(server: &mockito::Server) -> Arc<dyn RegistrationProvider> {
    let url = server.url();
    require_ok_or_panic(create_registration_client(&config(&[
        (OPENSRS_API_KEY, "K"),
        (OPENSRS_USERNAME, "U"),
        (OPENSRS_ENDPOINT, &url),
    ])))
}

fn email(server: &mockito::Server) -> Arc<dyn EmailHostingProvider> {
    let url = server.url();
    require_ok_or_panic(create_email_hosting_client(&config(&[
        (OPENSRS_EMAIL_USER, "admin@example.com"),
        (OPENSRS_EMAIL_PASSWORD, "pw"),
        (OPENSRS_EMAIL_CLUSTER, "a"),
        (OPENSRS_EMAIL_ENDPOINT, &url),
    ])))
}

fn require_ok_or_panic<T, E: std::fmt::Debug>(res: Result<T, E>) -> T {
    match res {
        Ok(v) => v,
        Err(e) => panic!("factory failed: {e:?}"),
    }
}

// ============ Registration ============

/// Exact bytes of a `GET_BALANCE` envelope (items sorted by key)
const GET_BALANCE_BODY: &str = "<?xml version='1.0' encoding='UTF-8' standalone='no' ?>\n\
<!DOCTYPE OPS_envelope SYSTEM 'ops.dtd'>\n\
<OPS_envelope><header><version>0.9</version></header><body><data_block><dt_assoc>\
<item key=\"action\">GET_BALANCE</item>\
<item key=\"attributes\"><dt_assoc></dt_assoc></item>\
<item key=\"object\">BALANCE</item>\
<item key=\"protocol\">XCP</item>\
</dt_assoc></data_block></body></OPS_envelope>";

fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

#[tokio::test]
async fn registration_request_is_signed_with_configured_credentials() {
    let key = "K";
    let expected_signature = md5_hex(&(md5_hex(&format!("{GET_BALANCE_BODY}{key}")) + key));

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_header("x-username", "U")
        .match_header("x-signature", expected_signature.as_str())
        .match_header("content-type", "text/xml")
        .match_body(Matcher::Exact(GET_BALANCE_BODY.to_string()))
        .with_body(ops_reply(
            "200",
            r#"<item key="balance">1234.56</item><item key="hold_balance">10.00</item>"#,
        ))
        .create_async()
        .await;

    let client = registrar(&server);
    assert_eq!(client.environment(), ProviderEnvironment::Test);

    let balance = require_ok!(client.get_balance().await);
    assert_eq!(balance.balance, "1234.56");
    assert_eq!(balance.hold_balance.as_deref(), Some("10.00"));
    mock.assert_async().await;
}

#[tokio::test]
async fn registration_lookup_available() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .match_body(Matcher::Regex("example.com".to_string()))
        .with_body(ops_reply("210", r#"<item key="status">available</item>"#))
        .create_async()
        .await;

    let result = require_ok!(registrar(&server).lookup_domain("Example.COM").await);
    assert_eq!(result.domain, "example.com");
    assert!(result.available);
    assert_eq!(result.status, "available");
}

#[tokio::test]
async fn registration_price_premium_flag() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .match_body(Matcher::Regex(r#"<item key="period">2</item>"#.to_string()))
        .with_body(ops_reply(
            "200",
            r#"<item key="price">25.00</item><item key="is_registry_premium">0</item>"#,
        ))
        .create_async()
        .await;

    let price = require_ok!(registrar(&server).get_price("example.com", 2).await);
    assert_eq!(price.price, "25.00");
    assert_eq!(price.period, 2);
    assert_eq!(price.is_premium, Some(false));
}

#[tokio::test]
async fn registration_rejected_key_validates_false() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_body(ops_failure("415", "Authentication Error"))
        .create_async()
        .await;

    let valid = require_ok!(registrar(&server).validate_credentials().await);
    assert!(!valid);
}

#[tokio::test]
async fn registration_http_forbidden_is_invalid_credentials() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(403)
        .with_body("Authentication failed")
        .create_async()
        .await;

    let err = registrar(&server).get_balance().await.err();
    assert!(matches!(err, Some(ProviderError::InvalidCredentials { .. })));
}

#[tokio::test]
async fn registration_period_out_of_range_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", "/").expect(0).create_async().await;

    let err = registrar(&server).get_price("example.com", 11).await.err();
    assert!(matches!(
        err,
        Some(ProviderError::InvalidParameter { ref param, .. }) if param == "period"
    ));
    mock.assert_async().await;
}

// ============ Email hosting ============

#[tokio::test]
async fn email_request_carries_credentials() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/get_domain")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "credentials": {"user": "admin@example.com", "password": "pw"},
            "domain": "example.com"
        })))
        .with_body(r#"{"success":true,"attributes":{"timezone":"UTC"}}"#)
        .create_async()
        .await;

    let domain = require_ok!(email(&server).get_domain("example.com").await);
    assert_eq!(domain.attributes["timezone"], "UTC");
    mock.assert_async().await;
}

#[tokio::test]
async fn email_unknown_domain() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/get_domain")
        .with_body(r#"{"success":false,"error":"Domain not found","error_number":5}"#)
        .create_async()
        .await;

    let err = email(&server).get_domain("missing.example").await.err();
    assert!(matches!(
        err,
        Some(ProviderError::DomainNotFound { ref domain, .. }) if domain == "missing.example"
    ));
}

// ============ Substituting a double ============

struct FixedRegistrar;

#[async_trait]
impl RegistrationProvider for FixedRegistrar {
    fn id(&self) -> &'static str {
        "fixed"
    }

    fn environment(&self) -> ProviderEnvironment {
        ProviderEnvironment::Test
    }

    fn endpoint(&self) -> &str {
        "memory://"
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Opensrs,
            name: "Fixed".to_string(),
            description: "In-memory registrar".to_string(),
            required_fields: Vec::new(),
            optional_fields: Vec::new(),
        }
    }

    async fn validate_credentials(&self) -> hostdesk_provider::Result<bool> {
        Ok(true)
    }

    async fn lookup_domain(&self, domain: &str) -> hostdesk_provider::Result<DomainAvailability> {
        Ok(DomainAvailability {
            domain: domain.to_string(),
            available: !domain.starts_with("taken"),
            status: "fixed".to_string(),
        })
    }

    async fn get_price(&self, domain: &str, period: u32) -> hostdesk_provider::Result<DomainPrice> {
        Ok(DomainPrice {
            domain: domain.to_string(),
            period,
            price: format!("{}.00", 10 * period),
            is_premium: None,
        })
    }

    async fn get_balance(&self) -> hostdesk_provider::Result<AccountBalance> {
        Ok(AccountBalance {
            balance: "0".to_string(),
            hold_balance: None,
        })
    }
}

async fn quote(registrar: &dyn RegistrationProvider, domain: &str) -> Option<String> {
    let availability = registrar.lookup_domain(domain).await.ok()?;
    if !availability.available {
        return None;
    }
    registrar.get_price(domain, 1).await.ok().map(|p| p.price)
}

#[tokio::test]
async fn double_substitutes_for_factory_client() {
    let registrar: Arc<dyn RegistrationProvider> = Arc::new(FixedRegistrar);
    assert_eq!(quote(registrar.as_ref(), "free.example").await.as_deref(), Some("10.00"));
    assert_eq!(quote(registrar.as_ref(), "taken.example").await, None);
}

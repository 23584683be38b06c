//! OpenSRS `RegistrationProvider` implementation

use async_trait::async_trait;

use crate::config::{OPENSRS_API_KEY, OPENSRS_ENDPOINT, OPENSRS_ENVIRONMENT, OPENSRS_USERNAME};
use crate::error::{ProviderError, Result};
use crate::providers::common::require_domain;
use crate::traits::{ErrorContext, ProviderErrorMapper, RegistrationProvider};
use crate::types::{
    AccountBalance, ConfigField, DomainAvailability, DomainPrice, FieldType, ProviderEnvironment,
    ProviderMetadata, ProviderType,
};

use super::{OpensrsProvider, OpsRequest};

/// LOOKUP reply code for an available name
const CODE_AVAILABLE: &str = "210";

#[async_trait]
impl RegistrationProvider for OpensrsProvider {
    fn id(&self) -> &'static str {
        "opensrs"
    }

    fn environment(&self) -> ProviderEnvironment {
        self.environment
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Opensrs,
            name: "OpenSRS".to_string(),
            description: "OpenSRS reseller domain registration (XML API)".to_string(),
            required_fields: vec![
                ConfigField::required(OPENSRS_API_KEY, "API Key", FieldType::Password)
                    .with_help("Generated in the Reseller Control Panel"),
                ConfigField::required(OPENSRS_USERNAME, "Reseller Username", FieldType::Text),
            ],
            optional_fields: vec![
                ConfigField::optional(OPENSRS_ENVIRONMENT, "Environment", Some("test"))
                    .with_help("test or live"),
                ConfigField::optional(OPENSRS_ENDPOINT, "Endpoint Override", None),
            ],
        }
    }

    async fn validate_credentials(&self) -> Result<bool> {
        match self.get_balance().await {
            Ok(_) => Ok(true),
            Err(ProviderError::InvalidCredentials { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn lookup_domain(&self, domain: &str) -> Result<DomainAvailability> {
        let domain = require_domain(domain, self.provider_name())?;
        let request = OpsRequest::new("LOOKUP", "DOMAIN").attribute("domain", domain.as_str());
        let response = self.call(&request, ErrorContext::domain(&domain)).await?;

        let status = response
            .attr("status")
            .map(str::to_string)
            .ok_or_else(|| self.parse_error("LOOKUP reply has no status attribute"))?;
        let available =
            status == "available" || response.response_code.as_deref() == Some(CODE_AVAILABLE);

        Ok(DomainAvailability {
            domain,
            available,
            status,
        })
    }

    async fn get_price(&self, domain: &str, period: u32) -> Result<DomainPrice> {
        let domain = require_domain(domain, self.provider_name())?;
        if !(1..=10).contains(&period) {
            return Err(ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "period".to_string(),
                detail: format!("period must be 1-10 years, got {period}"),
            });
        }

        let request = OpsRequest::new("GET_PRICE", "DOMAIN")
            .attribute("domain", domain.as_str())
            .attribute("period", period.to_string());
        let response = self.call(&request, ErrorContext::domain(&domain)).await?;

        let price = response
            .attr("price")
            .map(str::to_string)
            .ok_or_else(|| self.parse_error("GET_PRICE reply has no price attribute"))?;
        let is_premium = response.attr("is_registry_premium").map(|v| v == "1");

        Ok(DomainPrice {
            domain,
            period,
            price,
            is_premium,
        })
    }

    async fn get_balance(&self) -> Result<AccountBalance> {
        let request = OpsRequest::new("GET_BALANCE", "BALANCE");
        let response = self.call(&request, ErrorContext::default()).await?;

        let balance = response
            .attr("balance")
            .map(str::to_string)
            .ok_or_else(|| self.parse_error("GET_BALANCE reply has no balance attribute"))?;

        Ok(AccountBalance {
            balance,
            hold_balance: response.attr("hold_balance").map(str::to_string),
        })
    }
}

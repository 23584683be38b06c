//! OMA `EmailHostingProvider` implementation

use async_trait::async_trait;

use crate::config::{
    OPENSRS_EMAIL_CLUSTER, OPENSRS_EMAIL_ENDPOINT, OPENSRS_EMAIL_ENVIRONMENT,
    OPENSRS_EMAIL_PASSWORD, OPENSRS_EMAIL_USER,
};
use crate::error::{ProviderError, Result};
use crate::providers::common::require_domain;
use crate::traits::{EmailHostingProvider, ErrorContext, ProviderErrorMapper};
use crate::types::{
    ConfigField, EmailDomain, FieldType, Mailbox, ProviderEnvironment, ProviderMetadata,
    ProviderType,
};

use super::OpensrsEmailProvider;
use super::types::{AuthenticateParams, GetDomainParams, GetUserParams};

#[async_trait]
impl EmailHostingProvider for OpensrsEmailProvider {
    fn id(&self) -> &'static str {
        "opensrs_email"
    }

    fn environment(&self) -> ProviderEnvironment {
        self.environment
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::OpensrsEmail,
            name: "OpenSRS Email".to_string(),
            description: "OpenSRS hosted email administration (OMA JSON API)".to_string(),
            required_fields: vec![
                ConfigField::required(OPENSRS_EMAIL_USER, "Admin User", FieldType::Text),
                ConfigField::required(OPENSRS_EMAIL_PASSWORD, "Password", FieldType::Password),
                ConfigField::required(OPENSRS_EMAIL_CLUSTER, "Cluster", FieldType::Text)
                    .with_help("Cluster identifier, e.g. a or b"),
            ],
            optional_fields: vec![
                ConfigField::optional(OPENSRS_EMAIL_ENVIRONMENT, "Environment", Some("test"))
                    .with_help("test or live"),
                ConfigField::optional(OPENSRS_EMAIL_ENDPOINT, "Endpoint Override", None),
            ],
        }
    }

    async fn authenticate(&self) -> Result<String> {
        let params = AuthenticateParams {
            fetch_extra_info: false,
            generate_session_token: true,
        };
        let response = self
            .call("authenticate", params, ErrorContext::default())
            .await?;

        response
            .session_token
            .ok_or_else(|| self.parse_error("authenticate reply has no session_token"))
    }

    async fn get_domain(&self, domain: &str) -> Result<EmailDomain> {
        let domain = require_domain(domain, self.provider_name())?;
        let response = self
            .call(
                "get_domain",
                GetDomainParams { domain: &domain },
                ErrorContext::domain(&domain),
            )
            .await?;

        Ok(EmailDomain {
            name: domain,
            attributes: response.attributes.unwrap_or_default(),
        })
    }

    async fn get_user(&self, address: &str) -> Result<Mailbox> {
        let address = address.trim().to_ascii_lowercase();
        if !address.contains('@') {
            return Err(ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "user".to_string(),
                detail: format!("'{address}' is not a mailbox address"),
            });
        }

        let response = self
            .call(
                "get_user",
                GetUserParams { user: &address },
                ErrorContext::mailbox(&address),
            )
            .await?;

        Ok(Mailbox {
            address,
            attributes: response.attributes.unwrap_or_default(),
        })
    }
}

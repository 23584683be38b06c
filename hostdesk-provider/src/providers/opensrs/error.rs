//! OpenSRS error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::OpensrsProvider;

/// OpenSRS `response_code` mapping
/// Reference: <https://domains.opensrs.guide/docs/response-codes>
impl ProviderErrorMapper for OpensrsProvider {
    fn provider_name(&self) -> &'static str {
        "opensrs"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // 415: Authentication failed
            // 401/403: rejected at the HTTP layer (bad username or signature)
            Some("415" | "401" | "403") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // 465: Invalid domain syntax / unsupported TLD
            Some("465") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "domain".to_string(),
                detail: raw.message,
            },

            // 480: Domain not registered with this reseller
            Some("480") => ProviderError::DomainNotFound {
                provider: self.provider_name().to_string(),
                domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            // 400: Command failed (generic) and anything unmapped
            _ => self.unknown_error(raw),
        }
    }
}

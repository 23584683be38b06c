//! OMA error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::OpensrsEmailProvider;

/// OMA `error_number` mapping (HTTP status codes arrive through the same path)
impl ProviderErrorMapper for OpensrsEmailProvider {
    fn provider_name(&self) -> &'static str {
        "opensrs_email"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // 2: Authentication failed
            Some("2" | "401") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // 3: Not authorized for this object
            Some("3" | "403") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // 4: Invalid or missing parameter
            Some("4") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: if context.mailbox.is_some() {
                    "user".to_string()
                } else {
                    "domain".to_string()
                },
                detail: raw.message,
            },

            // 5: Object not found
            Some("5") => match (context.mailbox, context.domain) {
                (Some(mailbox), _) => ProviderError::MailboxNotFound {
                    provider: self.provider_name().to_string(),
                    mailbox,
                    raw_message: Some(raw.message),
                },
                (None, domain) => ProviderError::DomainNotFound {
                    provider: self.provider_name().to_string(),
                    domain: domain.unwrap_or_else(|| "<unknown>".to_string()),
                    raw_message: Some(raw.message),
                },
            },

            _ => self.unknown_error(raw),
        }
    }
}

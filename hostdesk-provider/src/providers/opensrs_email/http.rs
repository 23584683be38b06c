//! OMA request execution

use reqwest::header::CONTENT_TYPE;
use serde::Serialize;

use crate::error::Result;
use crate::http_client::{ApiCall, CallKind, log_api_error};
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{OmaRequest, OmaResponse, OpensrsEmailProvider};

/// `authenticate` and the `get_*`/`search_*` methods only read.
fn method_kind(method: &str) -> CallKind {
    if method == "authenticate" || method.starts_with("get_") || method.starts_with("search_") {
        CallKind::Query
    } else {
        CallKind::Command
    }
}

impl OpensrsEmailProvider {
    /// POST `/api/{method}` with credentials and `params`.
    ///
    /// Replies with `success: false` are mapped through [`ProviderErrorMapper`].
    pub(crate) async fn call<P: Serialize + Send>(
        &self,
        method: &str,
        params: P,
        context: ErrorContext,
    ) -> Result<OmaResponse> {
        let body = serde_json::to_vec(&OmaRequest {
            credentials: self.credentials(),
            params,
        })
        .map_err(|e| self.serialization_error(e))?;
        let call = ApiCall {
            provider: self.provider_name(),
            operation: method,
            kind: method_kind(method),
        };

        let builder = self
            .client
            .post(format!("{}/api/{method}", self.endpoint))
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        let reply = call.send(builder).await?;

        // OMA answers most failures with an error body, sometimes under a
        // non-2xx status; the status only decides when there is no such body.
        let response: OmaResponse = if reply.is_success() {
            reply.json(self.provider_name())?
        } else if let Ok(r) = serde_json::from_str::<OmaResponse>(&reply.body) {
            r
        } else {
            let err = self.map_error(reply.status_error(), context);
            log_api_error(&err);
            return Err(err);
        };

        if !response.success {
            let message = response
                .error
                .unwrap_or_else(|| format!("{method} failed (HTTP {})", reply.status));
            let raw = match response.error_number {
                Some(n) => RawApiError::with_code(n.to_string(), message),
                None => RawApiError::new(message),
            };
            let err = self.map_error(raw, context);
            log_api_error(&err);
            return Err(err);
        }

        Ok(response)
    }
}

//! OpenSRS request execution

use reqwest::header::CONTENT_TYPE;

use crate::error::Result;
use crate::http_client::{ApiCall, log_api_error};
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::envelope::parse_response;
use super::{OpensrsProvider, OpsRequest, OpsResponse};

impl OpensrsProvider {
    /// Sign and POST one OPS request, returning the decoded reply.
    ///
    /// Non-2xx statuses and replies with `is_success = 0` are mapped through
    /// [`ProviderErrorMapper`].
    pub(crate) async fn call(
        &self,
        request: &OpsRequest,
        context: ErrorContext,
    ) -> Result<OpsResponse> {
        let body = request.to_xml();
        let signature = self.sign(&body);
        let operation = format!("{} {}", request.action, request.object);
        let call = ApiCall {
            provider: self.provider_name(),
            operation: &operation,
            kind: request.kind(),
        };

        let builder = self
            .client
            .post(format!("{}/", self.endpoint))
            .header(CONTENT_TYPE, "text/xml")
            .header("X-Username", &self.reseller_username)
            .header("X-Signature", signature)
            .body(body);

        let reply = call.send(builder).await?;
        if !reply.is_success() {
            // OPS only answers with an envelope on 2xx
            let err = self.map_error(reply.status_error(), context);
            log_api_error(&err);
            return Err(err);
        }

        let response = parse_response(&reply.body).map_err(|e| {
            log::error!("[{}] OPS parse failed: {e}", self.provider_name());
            self.parse_error(e)
        })?;

        if !response.is_success {
            let err = self.map_error(
                RawApiError {
                    code: response.response_code,
                    message: response.response_text,
                },
                context,
            );
            log_api_error(&err);
            return Err(err);
        }

        Ok(response)
    }
}

//! Request transport shared by both OpenSRS APIs
//!
//! Every OpenSRS call is a POST, so the HTTP verb says nothing about whether a
//! call may be repeated. Each provider classifies its calls with [`CallKind`]:
//! queries are resent after transient failures, commands go out once.
//!
//! Signing, headers and body encoding stay with the providers.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::traits::RawApiError;
use crate::utils::log_sanitizer::truncate_for_log;

/// Extra attempts granted to a query.
const QUERY_RETRIES: u32 = 2;
const RETRY_AFTER_CAP_SECS: u64 = 30;
const BACKOFF_BASE_MS: u64 = 100;
const BACKOFF_CAP_MS: u64 = 10_000;

/// Whether resending a call can change state at the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallKind {
    /// Read-only (lookups, prices, balances, `get_*`).
    Query,
    /// Creates, modifies or charges; never resent.
    Command,
}

impl CallKind {
    fn retries(self) -> u32 {
        match self {
            Self::Query => QUERY_RETRIES,
            Self::Command => 0,
        }
    }
}

/// One API call as seen by logs and errors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ApiCall<'a> {
    pub provider: &'a str,
    /// OPS `action object` or OMA method name.
    pub operation: &'a str,
    pub kind: CallKind,
}

/// A reply that got past transport triage (anything but 429 and 502-504).
#[derive(Debug)]
pub(crate) struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Error keyed by the HTTP status, for replies without a provider envelope.
    pub fn status_error(&self) -> RawApiError {
        RawApiError::with_code(self.status.to_string(), truncate_for_log(&self.body))
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    /// `ParseError` if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self, provider: &str) -> Result<T, ProviderError> {
        serde_json::from_str(&self.body).map_err(|e| {
            log::error!(
                "[{provider}] JSON parse failed: {e}; body: {}",
                truncate_for_log(&self.body)
            );
            ProviderError::ParseError {
                provider: provider.to_string(),
                detail: e.to_string(),
            }
        })
    }
}

impl ApiCall<'_> {
    /// Send `request`, resending a query after a retryable failure.
    ///
    /// Waits 100ms, 200ms, 400ms... (at most 10s) between attempts, or the
    /// server's `Retry-After` (at most 30s) when rate limited.
    ///
    /// # Errors
    /// * `Timeout` / `NetworkError` for transport failures and HTTP 502-504
    /// * `RateLimited` for HTTP 429
    pub async fn send(&self, request: RequestBuilder) -> Result<HttpReply, ProviderError> {
        let retries = self.kind.retries();
        let mut pending = request;
        let mut attempt = 0;

        loop {
            // Clone before sending: the builder is consumed
            let spare = if attempt < retries {
                pending.try_clone()
            } else {
                None
            };

            match (self.send_once(pending).await, spare) {
                (Err(e), Some(next)) if e.is_retryable() => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "[{}] {} failed (attempt {}/{}), retrying in {}ms: {e}",
                        self.provider,
                        self.operation,
                        attempt + 1,
                        retries + 1,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    pending = next;
                    attempt += 1;
                }
                (result, _) => return result,
            }
        }
    }

    async fn send_once(&self, request: RequestBuilder) -> Result<HttpReply, ProviderError> {
        log::debug!("[{}] POST {}", self.provider, self.operation);

        let response = request.send().await.map_err(|e| self.transport_error(&e))?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: self.provider.to_string(),
                detail: format!("failed to read response body: {e}"),
            })?;

        match status {
            429 => {
                log::warn!(
                    "[{}] {} rate limited, retry_after={retry_after:?}",
                    self.provider,
                    self.operation
                );
                Err(ProviderError::RateLimited {
                    provider: self.provider.to_string(),
                    retry_after,
                    raw_message: Some(truncate_for_log(&body)),
                })
            }
            502..=504 => {
                log::warn!("[{}] {} got HTTP {status}", self.provider, self.operation);
                Err(ProviderError::NetworkError {
                    provider: self.provider.to_string(),
                    detail: format!("HTTP {status}: {}", truncate_for_log(&body)),
                })
            }
            _ => {
                log::debug!(
                    "[{}] HTTP {status}: {}",
                    self.provider,
                    truncate_for_log(&body)
                );
                Ok(HttpReply { status, body })
            }
        }
    }

    fn transport_error(&self, e: &reqwest::Error) -> ProviderError {
        let provider = self.provider.to_string();
        let detail = e.to_string();
        if e.is_timeout() {
            ProviderError::Timeout { provider, detail }
        } else {
            ProviderError::NetworkError { provider, detail }
        }
    }
}

/// Log a provider rejection at a level matching how surprising it is.
pub(crate) fn log_api_error(err: &ProviderError) {
    if err.is_expected() {
        log::warn!("{err}");
    } else {
        log::error!("{err}");
    }
}

fn retry_delay(error: &ProviderError, attempt: u32) -> Duration {
    match error {
        ProviderError::RateLimited {
            retry_after: Some(secs),
            ..
        } => Duration::from_secs((*secs).min(RETRY_AFTER_CAP_SECS)),
        _ => {
            let factor = 1_u64 << attempt.min(20);
            Duration::from_millis(BACKOFF_BASE_MS.saturating_mul(factor).min(BACKOFF_CAP_MS))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(kind: CallKind) -> ApiCall<'static> {
        ApiCall {
            provider: "test",
            operation: "GET_BALANCE BALANCE",
            kind,
        }
    }

    fn network_error() -> ProviderError {
        ProviderError::NetworkError {
            provider: "test".into(),
            detail: "reset".into(),
        }
    }

    #[test]
    fn commands_are_never_retried() {
        assert_eq!(CallKind::Command.retries(), 0);
        assert_eq!(CallKind::Query.retries(), QUERY_RETRIES);
    }

    #[test]
    fn backoff_doubles_up_to_cap() {
        assert_eq!(retry_delay(&network_error(), 0), Duration::from_millis(100));
        assert_eq!(retry_delay(&network_error(), 2), Duration::from_millis(400));
        // 100 * 2^7 = 12800ms
        assert_eq!(retry_delay(&network_error(), 7), Duration::from_secs(10));
        assert_eq!(retry_delay(&network_error(), u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn retry_after_wins_and_is_capped() {
        let e = ProviderError::RateLimited {
            provider: "test".into(),
            retry_after: Some(120),
            raw_message: None,
        };
        assert_eq!(retry_delay(&e, 0), Duration::from_secs(30));
    }

    #[test]
    fn status_error_carries_status_code() {
        let reply = HttpReply {
            status: 401,
            body: "denied".into(),
        };
        assert!(!reply.is_success());
        let raw = reply.status_error();
        assert_eq!(raw.code.as_deref(), Some("401"));
        assert_eq!(raw.message, "denied");
    }

    #[test]
    fn json_reports_parse_error() {
        let reply = HttpReply {
            status: 200,
            body: "not json".into(),
        };
        let result: Result<serde_json::Value, _> = reply.json("test");
        assert!(
            matches!(&result, Err(ProviderError::ParseError { .. })),
            "unexpected parse result: {result:?}"
        );
    }

    // ---- send (local mock server) ----

    #[tokio::test]
    async fn status_429_maps_to_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(429)
            .with_header("retry-after", "7")
            .with_body("slow down")
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let result = call(CallKind::Command).send(client.post(server.url())).await;

        assert!(
            matches!(
                &result,
                Err(ProviderError::RateLimited {
                    retry_after: Some(7),
                    ..
                })
            ),
            "unexpected result: {result:?}"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn query_is_resent_after_gateway_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(503)
            .with_body("upstream down")
            .expect(3)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let result = call(CallKind::Query)
            .send(client.post(server.url()).body("<OPS_envelope/>"))
            .await;

        assert!(
            matches!(&result, Err(ProviderError::NetworkError { detail, .. }) if detail.starts_with("HTTP 503")),
            "unexpected result: {result:?}"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn command_is_sent_once_after_gateway_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let result = ApiCall {
            provider: "test",
            operation: "SW_REGISTER DOMAIN",
            kind: CallKind::Command,
        }
        .send(client.post(server.url()).body("<OPS_envelope/>"))
        .await;

        assert!(
            matches!(&result, Err(ProviderError::NetworkError { .. })),
            "unexpected result: {result:?}"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn business_status_is_returned_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(401)
            .with_body("denied")
            .expect(1)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let result = call(CallKind::Query).send(client.post(server.url())).await;

        assert!(
            matches!(&result, Ok(HttpReply { status: 401, body }) if body == "denied"),
            "unexpected result: {result:?}"
        );
        mock.assert_async().await;
    }
}

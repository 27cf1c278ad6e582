//! Workflow webhook relay
//!
//! Forwards a submission body to the external workflow webhook. Each
//! attempt has its own timeout. Only connect errors are retried, with
//! exponential backoff and random jitter. A timed-out request may already
//! have created a claim downstream, so it is reported, not resent. Any HTTP
//! answer from the webhook, successful or not, ends the loop.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, StatusCode};
use rand::Rng;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ProxyConfig, WebhookTarget};
use crate::error::ApiError;

/// Header carrying the shared secret
pub const SECRET_HEADER: &str = "x-recall-secret";

/// Upper bound on a single backoff delay
const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Bounded retry policy for connect failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry, doubled for each one after
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self {
            max_retries: config.webhook_max_retries,
            base_delay: Duration::from_millis(config.webhook_retry_delay_ms),
            max_delay: MAX_BACKOFF,
        }
    }

    /// Never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (zero-based)
    ///
    /// Half of the capped exponential delay is fixed, the other half is
    /// random, so the result lies in `[d/2, d]`.
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponential = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(retry))
            .min(self.max_delay);

        let half = exponential / 2;
        let spread = (exponential - half).as_millis() as u64;
        let jitter = if spread == 0 {
            0
        } else {
            rand::rng().random_range(0..=spread)
        };

        half + Duration::from_millis(jitter)
    }
}

/// The webhook's answer, with its body decoded
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: StatusCode,
    /// JSON body, or `{"message": <text>}` when the body is not JSON
    pub body: Value,
}

/// The webhook could not be reached
#[derive(Debug, Error)]
#[error("Webhook unreachable after {attempts} attempt(s): {source}")]
pub struct RelayFailure {
    pub attempts: u32,
    #[source]
    pub source: reqwest::Error,
}

impl From<RelayFailure> for ApiError {
    fn from(_: RelayFailure) -> Self {
        ApiError::Unreachable
    }
}

/// Client for the workflow webhook
#[derive(Debug, Clone)]
pub struct WebhookRelay {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl WebhookRelay {
    /// Creates a relay with the configured timeout and retry policy
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ProxyConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.webhook_timeout())
            .build()?;

        Ok(Self::with_client(client, RetryPolicy::from_config(config)))
    }

    pub fn with_client(client: reqwest::Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Posts `body` verbatim to the webhook
    ///
    /// # Errors
    ///
    /// Returns `RelayFailure` when no HTTP answer was obtained within the
    /// retry budget, or when the answer's body could not be read.
    pub async fn forward(&self, target: &WebhookTarget, body: Bytes) -> Result<UpstreamReply, RelayFailure> {
        let mut attempts = 0;

        let response = loop {
            attempts += 1;

            let result = self
                .client
                .post(&target.url)
                .header(header::CONTENT_TYPE, "application/json")
                .header(SECRET_HEADER, &target.secret)
                .body(body.clone())
                .send()
                .await;

            match result {
                Ok(response) => break response,
                Err(e) if is_transient(&e) && attempts <= self.retry.max_retries => {
                    let delay = self.retry.backoff(attempts - 1);
                    warn!(
                        attempt = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Webhook unreachable, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(source) => return Err(RelayFailure { attempts, source }),
            }
        };

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| RelayFailure { attempts, source })?;

        debug!(status = status.as_u16(), attempts, "Webhook answered");

        Ok(UpstreamReply {
            status,
            body: decode_body(&text),
        })
    }
}

/// True when no connection was made, so nothing reached the webhook
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect()
}

/// Decodes a webhook body, wrapping non-JSON text as `{"message": text}`
pub fn decode_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "message": text }))
}

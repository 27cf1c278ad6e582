//! HTTP transport for the intake form
//!
//! Posts a normalized submission to the proxy's `/api/submit` route and
//! turns the proxy's JSON answer back into a receipt or a transport error.

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use domain_recall::form::NETWORK_FAILURE_MESSAGE;
use domain_recall::{ClaimSubmission, Prefill, SubmissionReceipt, SubmissionTransport, TransportError};

/// Path of the proxy endpoint
pub const SUBMIT_PATH: &str = "/api/submit";

/// Submits claims to a running proxy
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmitter {
    /// Creates a submitter for the proxy at `base_url`
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), SUBMIT_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SubmissionTransport for HttpSubmitter {
    async fn submit(&self, submission: &ClaimSubmission) -> Result<SubmissionReceipt, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;

        debug!(status = status.as_u16(), "Proxy answered");

        if !status.is_success() {
            let message = text_field(&body, "error")
                .unwrap_or_else(|| NETWORK_FAILURE_MESSAGE.to_string());
            return Err(TransportError::rejected(status.as_u16(), message));
        }

        Ok(SubmissionReceipt {
            message: text_field(&body, "message"),
            account_id: text_field(&body, "account_id"),
            submission_id: text_field(&body, "submission_id"),
        })
    }
}

/// Reads a string or number field as text
fn text_field(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads the prefill values from a form link such as
/// `https://recall.example.com/?phone=%2B15551234567&model=RY1&serial=AB1`
pub fn prefill_from_url(url: &Url) -> Prefill {
    Prefill::from_query_pairs(url.query_pairs())
}

//! Intake form state machine
//!
//! A headless model of the claim form: it holds the raw field values, the
//! submission status and the message shown to the customer.
//!
//! # Status Lifecycle
//!
//! ```text
//! Idle -> Submitting -> Success
//!                    -> Error -> Submitting -> ...
//! ```
//!
//! Validation runs before anything leaves the form, so an invalid form
//! never reaches the transport.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::TransportError;
use crate::submission::{ClaimSubmission, FormFields, SubmissionReceipt};

/// Shown when the proxy accepts a submission without a message of its own
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Submission received. You may now close this page.";

/// Shown when the proxy cannot be reached
pub const NETWORK_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Submission status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

/// Values carried in the link sent to the customer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefill {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial: String,
}

impl Prefill {
    /// Picks `phone`, `model` and `serial` out of decoded query pairs
    ///
    /// Unknown keys are ignored; a repeated key keeps its first value.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut prefill = Prefill::default();
        let (mut phone, mut model, mut serial) = (false, false, false);

        for (key, value) in pairs {
            match key.as_ref() {
                "phone" if !phone => {
                    prefill.phone = value.into();
                    phone = true;
                }
                "model" if !model => {
                    prefill.model = value.into();
                    model = true;
                }
                "serial" if !serial => {
                    prefill.serial = value.into();
                    serial = true;
                }
                _ => {}
            }
        }

        prefill
    }
}

/// Delivers a normalized submission to the proxy
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn submit(&self, submission: &ClaimSubmission) -> Result<SubmissionReceipt, TransportError>;
}

/// The intake form
#[derive(Debug, Clone, Default)]
pub struct IntakeForm {
    fields: FormFields,
    status: SubmissionStatus,
    message: String,
    receipt: Option<SubmissionReceipt>,
}

impl IntakeForm {
    /// Creates an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a form with phone, model and serial filled from a link
    ///
    /// Prefilled values are not checked until submit.
    pub fn with_prefill(prefill: Prefill) -> Self {
        let mut form = Self::new();
        form.fields.phone = prefill.phone;
        form.fields.model = prefill.model;
        form.fields.serial = prefill.serial;
        form
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Mutable access for input handlers
    pub fn fields_mut(&mut self) -> &mut FormFields {
        &mut self.fields
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    /// Message for the customer; empty until a submit finishes
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Proxy receipt from the last successful submit
    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    /// Whether the submit button is enabled
    pub fn can_submit(&self) -> bool {
        self.status != SubmissionStatus::Submitting
    }

    /// Validates, normalizes and hands the form to the transport
    ///
    /// Returns the resulting status. Nothing is retried: after an error
    /// the customer may edit the form and submit again.
    pub async fn submit<T>(&mut self, transport: &T) -> SubmissionStatus
    where
        T: SubmissionTransport + ?Sized,
    {
        if !self.can_submit() {
            debug!("Submit ignored while a submission is in flight");
            return self.status;
        }

        self.status = SubmissionStatus::Submitting;
        self.message.clear();
        self.receipt = None;

        let submission = match ClaimSubmission::from_form(&self.fields, Utc::now()) {
            Ok(submission) => submission,
            Err(e) => {
                debug!(error = %e, "Form validation failed");
                return self.finish(SubmissionStatus::Error, e.to_string());
            }
        };

        match transport.submit(&submission).await {
            Ok(receipt) => {
                info!(
                    account_id = receipt.account_id.as_deref().unwrap_or("-"),
                    submission_id = receipt.submission_id.as_deref().unwrap_or("-"),
                    "Claim submitted"
                );
                let message = receipt
                    .message
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());
                self.receipt = Some(receipt);
                self.finish(SubmissionStatus::Success, message)
            }
            Err(TransportError::Rejected { status, message }) => {
                warn!(status, message = %message, "Claim rejected by proxy");
                self.finish(SubmissionStatus::Error, message)
            }
            Err(e @ TransportError::Network(_)) => {
                warn!(error = %e, "Claim submission failed");
                self.finish(SubmissionStatus::Error, NETWORK_FAILURE_MESSAGE.to_string())
            }
        }
    }

    fn finish(&mut self, status: SubmissionStatus, message: String) -> SubmissionStatus {
        self.status = status;
        self.message = message;
        status
    }
}

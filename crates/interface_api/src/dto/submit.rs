//! Submission DTOs

use serde::Serialize;
use serde_json::Value;

/// Fallback message when the webhook accepts without saying anything
pub const DEFAULT_ACCEPTED_MESSAGE: &str = "Submission received.";

/// Fallback message when the webhook rejects without an error text
pub const DEFAULT_WORKFLOW_ERROR: &str = "Workflow failed.";

/// Successful proxy answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitResponse {
    pub ok: bool,
    pub message: String,
    /// Copied verbatim from the webhook
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Value>,
    /// Copied verbatim from the webhook
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<Value>,
}

//! Submission proxy handler
//!
//! ```text
//! received -> configured? -> parsed? -> validated? -> relayed -> translated
//! ```
//!
//! Each `?` step ends the request with an error when it fails.

use axum::{
    body::{to_bytes, Body},
    extract::State,
    Json,
};
use serde_json::Value;
use tracing::{info, warn};

use domain_recall::RelayFields;

use crate::dto::submit::{SubmitResponse, DEFAULT_ACCEPTED_MESSAGE, DEFAULT_WORKFLOW_ERROR};
use crate::error::ApiError;
use crate::relay::UpstreamReply;
use crate::AppState;

/// Largest request body the proxy will read
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Relays a claim submission to the workflow webhook
pub async fn submit_claim(
    State(state): State<AppState>,
    body: Body,
) -> Result<Json<SubmitResponse>, ApiError> {
    let target = state.config.webhook_target().inspect_err(|e| {
        warn!(error = %e, "Rejecting submission, webhook not configured");
    })?;

    let raw = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| ApiError::InvalidJson)?;
    let payload: Value = serde_json::from_slice(&raw).map_err(|_| ApiError::InvalidJson)?;

    let fields = RelayFields::extract(&payload)?;
    info!(
        model_number = %fields.model_number,
        serial_number = %fields.serial_number,
        "Relaying claim submission"
    );

    let reply = state.relay.forward(&target, raw).await.inspect_err(|e| {
        warn!(error = %e, "Could not reach workflow webhook");
    })?;

    translate(reply).map(Json)
}

/// Maps the webhook's answer onto the proxy's response shape
pub fn translate(reply: UpstreamReply) -> Result<SubmitResponse, ApiError> {
    let UpstreamReply { status, body } = reply;

    if !status.is_success() {
        let message = text(&body, "error").unwrap_or(DEFAULT_WORKFLOW_ERROR).to_string();
        warn!(status = status.as_u16(), message = %message, "Workflow rejected submission");

        return Err(ApiError::Upstream {
            status,
            message,
            details: body,
        });
    }

    Ok(SubmitResponse {
        ok: true,
        message: text(&body, "message").unwrap_or(DEFAULT_ACCEPTED_MESSAGE).to_string(),
        account_id: identifier(&body, "account_id"),
        submission_id: identifier(&body, "submission_id"),
    })
}

fn text<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn identifier(body: &Value, key: &str) -> Option<Value> {
    body.get(key).filter(|v| !v.is_null()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    fn reply(status: StatusCode, body: Value) -> UpstreamReply {
        UpstreamReply { status, body }
    }

    #[test]
    fn test_translate_success() {
        let response = translate(reply(StatusCode::OK, json!({"message": "ok", "account_id": "A1"}))).unwrap();

        assert!(response.ok);
        assert_eq!(response.message, "ok");
        assert_eq!(response.account_id, Some(json!("A1")));
        assert_eq!(response.submission_id, None);
    }

    #[test]
    fn test_translate_success_default_message() {
        let response = translate(reply(StatusCode::CREATED, json!({"message": ""}))).unwrap();
        assert_eq!(response.message, DEFAULT_ACCEPTED_MESSAGE);

        let response = translate(reply(StatusCode::OK, json!([1, 2, 3]))).unwrap();
        assert_eq!(response.message, DEFAULT_ACCEPTED_MESSAGE);
    }

    #[test]
    fn test_translate_failure_uses_upstream_error() {
        let err = translate(reply(StatusCode::CONFLICT, json!({"error": "Duplicate claim"}))).unwrap_err();

        match err {
            ApiError::Upstream { status, message, details } => {
                assert_eq!(status, StatusCode::CONFLICT);
                assert_eq!(message, "Duplicate claim");
                assert_eq!(details, json!({"error": "Duplicate claim"}));
            }
            other => panic!("Expected Upstream error, got {:?}", other),
        }
    }

    #[test]
    fn test_translate_failure_default_message() {
        let err = translate(reply(StatusCode::INTERNAL_SERVER_ERROR, json!({"message": "boom"}))).unwrap_err();

        assert_eq!(err.to_string(), DEFAULT_WORKFLOW_ERROR);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

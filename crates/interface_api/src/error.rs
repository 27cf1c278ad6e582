//! API error handling
//!
//! Every failure leaves the proxy as a single JSON object
//! `{ "error": ..., "status"?: ..., "details"?: ... }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain_recall::RelayError;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required server settings are missing
    #[error("Server not configured (missing {0}).")]
    NotConfigured(String),

    /// The request body is not JSON
    #[error("Invalid JSON.")]
    InvalidJson,

    /// The payload failed re-validation
    #[error("{0}")]
    BadRequest(String),

    /// The webhook answered with a non-success status
    #[error("{message}")]
    Upstream {
        status: StatusCode,
        message: String,
        details: Value,
    },

    /// The webhook could not be reached
    #[error("Could not reach workflow service.")]
    Unreachable,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    /// Creates a NotConfigured error naming the missing setting
    pub fn not_configured(setting: impl Into<String>) -> Self {
        ApiError::NotConfigured(setting.into())
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidJson | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { status, .. } => *status,
            ApiError::Unreachable => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        let body = match self {
            ApiError::Upstream { status, details, .. } => ErrorResponse {
                error: message,
                status: Some(status.as_u16()),
                details: Some(details),
            },
            _ => ErrorResponse {
                error: message,
                status: None,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::not_configured("X").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::InvalidJson.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unreachable.status_code(), StatusCode::BAD_GATEWAY);

        let upstream = ApiError::Upstream {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "nope".to_string(),
            details: json!({}),
        };
        assert_eq!(upstream.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_relay_error_conversion() {
        let err: ApiError = RelayError::InvalidPhone.into();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Phone number format looks invalid.");
    }

    #[test]
    fn test_plain_errors_omit_optional_fields() {
        let body = ErrorResponse {
            error: ApiError::Unreachable.to_string(),
            status: None,
            details: None,
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json, json!({"error": "Could not reach workflow service."}));
    }
}

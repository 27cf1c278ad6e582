//! Liveness and readiness checks for the recall proxy
//!
//! `/health` answers as long as the process serves requests. `/health/ready`
//! additionally needs a complete webhook target, since every submission
//! would fail with 500 without one. The target itself is never echoed.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Body of both health endpoints
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    /// Why the proxy is not ready; omitted when it is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl HealthReport {
    fn status(status: &'static str) -> Self {
        Self {
            status,
            version: VERSION,
            reason: None,
        }
    }
}

pub async fn health_check() -> Json<HealthReport> {
    Json(HealthReport::status("healthy"))
}

/// 200 once the webhook URL and secret are both set, 503 otherwise
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    match state.config.webhook_target() {
        Ok(_) => (StatusCode::OK, Json(HealthReport::status("ready"))),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthReport {
                reason: Some(e.to_string()),
                ..HealthReport::status("not_ready")
            }),
        ),
    }
}

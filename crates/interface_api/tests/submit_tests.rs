//! Tests for the submission proxy endpoint

use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use interface_api::config::{ProxyConfig, WebhookTarget};
use interface_api::relay::{RetryPolicy, WebhookRelay, SECRET_HEADER};
use interface_api::{create_router, AppState};
use test_utils::{assert_error_message, unreachable_url, PayloadFixtures, StubWebhook};

const SECRET: &str = "test-shared-secret";

fn fast_retries() -> RetryPolicy {
    RetryPolicy {
        max_retries: 2,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
    }
}

fn server_with(webhook_url: Option<String>, secret: Option<&str>, timeout: Duration, retry: RetryPolicy) -> TestServer {
    let config = ProxyConfig {
        webhook_url,
        webhook_secret: secret.map(str::to_string),
        ..Default::default()
    };
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("client builds");
    let state = AppState::with_relay(config, WebhookRelay::with_client(client, retry));

    TestServer::new(create_router(state)).expect("test server starts")
}

fn server_for(webhook_url: impl Into<String>) -> TestServer {
    server_with(Some(webhook_url.into()), Some(SECRET), Duration::from_secs(5), fast_retries())
}

// ============================================================================
// Configuration
// ============================================================================

mod configuration {
    use super::*;

    #[tokio::test]
    async fn test_missing_webhook_url_is_server_error() {
        let server = server_with(None, Some(SECRET), Duration::from_secs(1), RetryPolicy::none());

        let response = server.post("/api/submit").json(&PayloadFixtures::minimal()).await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_error_message(
            &response.json::<Value>(),
            "Server not configured (missing RECALL_WEBHOOK_URL).",
        );
    }

    #[tokio::test]
    async fn test_missing_secret_is_checked_before_body() {
        let stub = StubWebhook::respond(StatusCode::OK, "{}").await;
        let server = server_with(Some(stub.url()), None, Duration::from_secs(1), RetryPolicy::none());

        let response = server.post("/api/submit").text("{not json").await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_error_message(
            &response.json::<Value>(),
            "Server not configured (missing RECALL_WEBHOOK_SECRET).",
        );
        assert!(stub.received().is_empty());
    }
}

// ============================================================================
// Request Validation
// ============================================================================

mod request_validation {
    use super::*;

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let stub = StubWebhook::respond(StatusCode::OK, "{}").await;
        let server = server_for(stub.url());

        let response = server.post("/api/submit").text("{\"phone\": ").await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>(), json!({"error": "Invalid JSON."}));
        assert!(stub.received().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_phone_is_rejected() {
        let stub = StubWebhook::respond(StatusCode::OK, "{}").await;
        let server = server_for(stub.url());

        let response = server.post("/api/submit").json(&PayloadFixtures::invalid_phone()).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_error_message(&response.json::<Value>(), "Phone number format looks invalid.");
        assert!(stub.received().is_empty());
    }

    #[tokio::test]
    async fn test_missing_serial_is_rejected() {
        let stub = StubWebhook::respond(StatusCode::OK, "{}").await;
        let server = server_for(stub.url());

        let response = server.post("/api/submit").json(&PayloadFixtures::missing_serial()).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_error_message(
            &response.json::<Value>(),
            "Missing phone, model number, or serial number.",
        );
    }

    #[tokio::test]
    async fn test_alias_keys_are_accepted() {
        let stub = StubWebhook::respond(StatusCode::OK, r#"{"message":"ok"}"#).await;
        let server = server_for(stub.url());

        let response = server.post("/api/submit").json(&PayloadFixtures::aliased()).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(stub.received().len(), 1);
    }
}

// ============================================================================
// Relay
// ============================================================================

mod relay {
    use super::*;

    #[tokio::test]
    async fn test_success_is_translated() {
        let stub = StubWebhook::respond(StatusCode::OK, r#"{"message":"ok","account_id":"A1"}"#).await;
        let server = server_for(stub.url());

        let response = server.post("/api/submit").json(&PayloadFixtures::minimal()).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(
            response.json::<Value>(),
            json!({"ok": true, "message": "ok", "account_id": "A1"})
        );
    }

    #[tokio::test]
    async fn test_full_body_is_forwarded_with_secret() {
        let stub = StubWebhook::respond(StatusCode::OK, r#"{"submission_id":"S9"}"#).await;
        let server = server_for(stub.url());
        let payload = json!({
            "phone": "+15551234567",
            "model_number": "RY1",
            "serial_number": "AB1",
            "first_name": "Jane",
            "address": {"city": "Austin", "state": "TX"},
            "consent": true
        });

        let response = server.post("/api/submit").json(&payload).await;

        assert_eq!(
            response.json::<Value>(),
            json!({"ok": true, "message": "Submission received.", "submission_id": "S9"})
        );

        let received = stub.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].header("content-type"), Some("application/json"));
        assert_eq!(received[0].header(SECRET_HEADER), Some(SECRET));
        assert_eq!(received[0].json(), payload);
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_propagated() {
        let stub = StubWebhook::respond(StatusCode::CONFLICT, r#"{"error":"Duplicate claim"}"#).await;
        let server = server_for(stub.url());

        let response = server.post("/api/submit").json(&PayloadFixtures::minimal()).await;

        assert_eq!(response.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            response.json::<Value>(),
            json!({
                "error": "Duplicate claim",
                "status": 409,
                "details": {"error": "Duplicate claim"}
            })
        );
    }

    #[tokio::test]
    async fn test_upstream_text_error_is_wrapped() {
        let stub = StubWebhook::respond(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;
        let server = server_for(stub.url());

        let response = server.post("/api/submit").json(&PayloadFixtures::minimal()).await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Value>(),
            json!({
                "error": "Workflow failed.",
                "status": 500,
                "details": {"message": "boom"}
            })
        );
        assert_eq!(stub.received().len(), 1);
    }

    #[tokio::test]
    async fn test_upstream_text_success_becomes_message() {
        let stub = StubWebhook::respond(StatusCode::OK, "Workflow was started").await;
        let server = server_for(stub.url());

        let response = server.post("/api/submit").json(&PayloadFixtures::minimal()).await;

        assert_eq!(
            response.json::<Value>(),
            json!({"ok": true, "message": "Workflow was started"})
        );
    }

    #[tokio::test]
    async fn test_unreachable_webhook_is_bad_gateway() {
        let server = server_for(unreachable_url().await);

        let response = server.post("/api/submit").json(&PayloadFixtures::minimal()).await;

        assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.json::<Value>(),
            json!({"error": "Could not reach workflow service."})
        );
    }

    #[tokio::test]
    async fn test_slow_webhook_times_out() {
        let stub = StubWebhook::respond_after(Duration::from_secs(3), StatusCode::OK, "{}").await;
        let server = server_with(
            Some(stub.url()),
            Some(SECRET),
            Duration::from_millis(200),
            fast_retries(),
        );

        let response = server.post("/api/submit").json(&PayloadFixtures::minimal()).await;

        assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
        // the webhook may have acted on it, so it is not resent
        assert_eq!(stub.received().len(), 1);
    }

    #[tokio::test]
    async fn test_connect_failure_uses_retry_budget() {
        let relay = WebhookRelay::with_client(reqwest::Client::new(), fast_retries());
        let target = WebhookTarget {
            url: unreachable_url().await,
            secret: SECRET.to_string(),
        };

        let failure = relay.forward(&target, "{}".into()).await.unwrap_err();

        // one attempt plus two retries
        assert_eq!(failure.attempts, 3);
    }

    #[tokio::test]
    async fn test_timed_out_attempt_is_not_retried() {
        let stub = StubWebhook::respond_after(Duration::from_secs(3), StatusCode::OK, "{}").await;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .expect("client builds");
        let relay = WebhookRelay::with_client(client, fast_retries());
        let target = WebhookTarget {
            url: stub.url(),
            secret: SECRET.to_string(),
        };

        let failure = relay.forward(&target, "{}".into()).await.unwrap_err();

        assert_eq!(failure.attempts, 1);
        assert!(failure.source.is_timeout());
    }

    #[tokio::test]
    async fn test_upstream_error_is_not_retried() {
        let stub = StubWebhook::respond(StatusCode::SERVICE_UNAVAILABLE, "{}").await;
        let server = server_for(stub.url());

        let response = server.post("/api/submit").json(&PayloadFixtures::minimal()).await;

        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(stub.received().len(), 1);
    }
}

// ============================================================================
// Health and Middleware
// ============================================================================

mod health {
    use super::*;

    #[tokio::test]
    async fn test_health_is_always_ok() {
        let server = server_with(None, None, Duration::from_secs(1), RetryPolicy::none());

        let response = server.get("/health").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_requires_webhook() {
        let server = server_with(None, Some(SECRET), Duration::from_secs(1), RetryPolicy::none());
        let response = server.get("/health/ready").await;

        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        let body = response.json::<Value>();
        assert_eq!(body["status"], "not_ready");
        assert_eq!(body["reason"], "Server not configured (missing RECALL_WEBHOOK_URL).");

        let server = server_for("http://127.0.0.1:9/webhook");
        let response = server.get("/health/ready").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.json::<Value>();
        assert_eq!(body["status"], "ready");
        assert!(body.get("reason").is_none());
    }

    #[tokio::test]
    async fn test_readiness_does_not_leak_secret() {
        let server = server_for("http://127.0.0.1:9/webhook");

        let text = server.get("/health/ready").await.text();

        assert!(!text.contains(SECRET));
        assert!(!text.contains("127.0.0.1:9"));
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let server = server_with(None, None, Duration::from_secs(1), RetryPolicy::none());

        let response = server.post("/api/submit").json(&PayloadFixtures::minimal()).await;

        assert!(response.headers().contains_key("x-request-id"));
    }
}

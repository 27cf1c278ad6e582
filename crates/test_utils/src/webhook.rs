//! Stub Workflow Webhook
//!
//! A local HTTP server standing in for the external workflow system. It
//! answers every `POST /webhook` with a canned response and records what
//! it received, so proxy tests can assert on the relayed request.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request captured by the stub
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ReceivedRequest {
    /// Returns a header value as text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Parses the body as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

/// A running stub webhook, shut down on drop
pub struct StubWebhook {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
    handle: JoinHandle<()>,
}

impl StubWebhook {
    /// Starts a stub answering with `status` and `body`
    pub async fn respond(status: StatusCode, body: impl Into<String>) -> Self {
        Self::start(status, body.into(), None).await
    }

    /// Starts a stub that waits `delay` before answering
    pub async fn respond_after(delay: Duration, status: StatusCode, body: impl Into<String>) -> Self {
        Self::start(status, body.into(), Some(delay)).await
    }

    async fn start(status: StatusCode, body: String, delay: Option<Duration>) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            status,
            body,
            delay,
            received: received.clone(),
        };

        let app = Router::new()
            .route("/webhook", post(receive))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub webhook");
        let addr = listener.local_addr().expect("Stub webhook has no address");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::warn!(error = %e, "Stub webhook stopped");
            }
        });

        Self {
            addr,
            received,
            handle,
        }
    }

    /// URL to configure as the webhook target
    pub fn url(&self) -> String {
        format!("http://{}/webhook", self.addr)
    }

    /// Requests received so far
    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().expect("stub lock poisoned").clone()
    }
}

impl Drop for StubWebhook {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn receive(State(state): State<StubState>, headers: HeaderMap, body: Bytes) -> Response {
    state
        .received
        .lock()
        .expect("stub lock poisoned")
        .push(ReceivedRequest { headers, body });

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    let content_type = if serde_json::from_str::<serde_json::Value>(&state.body).is_ok() {
        "application/json"
    } else {
        "text/plain"
    };

    (state.status, [(header::CONTENT_TYPE, content_type)], state.body).into_response()
}

/// Returns a URL on a local port nothing is listening on
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind throwaway listener");
    let addr = listener.local_addr().expect("Throwaway listener has no address");
    drop(listener);

    format!("http://{}/webhook", addr)
}

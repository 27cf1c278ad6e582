//! Recall Submission Proxy - Server Binary
//!
//! This binary starts the HTTP proxy that relays recall claim submissions
//! to the workflow webhook.
//!
//! # Usage
//!
//! ```bash
//! RECALL_WEBHOOK_URL=https://hooks.example.com/recall \
//! RECALL_WEBHOOK_SECRET=... \
//! cargo run --bin recall-proxy
//! ```
//!
//! # Environment Variables
//!
//! * `RECALL_HOST` - Server host (default: 0.0.0.0)
//! * `RECALL_PORT` - Server port (default: 8080)
//! * `RECALL_WEBHOOK_URL` - Workflow webhook URL (required to accept submissions)
//! * `RECALL_WEBHOOK_SECRET` - Shared secret sent to the webhook (required to accept submissions)
//! * `RECALL_WEBHOOK_TIMEOUT_SECS` - Per-attempt webhook timeout (default: 10)
//! * `RECALL_WEBHOOK_MAX_RETRIES` - Retries after a connectivity failure (default: 2)
//! * `RECALL_WEBHOOK_RETRY_DELAY_MS` - Base backoff delay (default: 250)
//! * `RECALL_CORS_ALLOW_ORIGIN` - Origin allowed to call the API cross-site
//! * `RECALL_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `RECALL_LOG_JSON` - Emit JSON log lines (default: false)

use std::net::SocketAddr;

use anyhow::Context;
use interface_api::{config::ProxyConfig, create_router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use validator::Validate;

/// Main entry point for the proxy server.
///
/// Initializes logging, loads and validates configuration, and starts the
/// HTTP server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded or is invalid
/// - The webhook client cannot be built
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ProxyConfig::from_env().context("Failed to load configuration")?;

    init_tracing(&config.log_level, config.log_json);

    config.validate().context("Invalid configuration")?;

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting recall submission proxy"
    );

    if let Err(e) = config.webhook_target() {
        tracing::warn!(error = %e, "Submissions will be rejected until the webhook is configured");
    }

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .context("Invalid server address")?;

    let state = AppState::new(config).context("Failed to build webhook client")?;
    let app = create_router(state);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// # Arguments
///
/// * `log_level` - Fallback filter when `RUST_LOG` is not set
/// * `json` - Emit JSON lines instead of human-readable output
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// In-flight requests complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

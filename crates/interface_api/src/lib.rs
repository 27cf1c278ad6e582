//! Recall Submission Proxy
//!
//! This crate provides the HTTP side of the recall intake flow using Axum:
//! the proxy that relays claim submissions to the workflow webhook, and the
//! HTTP transport the intake form uses to reach it.
//!
//! # Architecture
//!
//! - **Handlers**: `POST /api/submit` and the health checks
//! - **Relay**: Outbound webhook call with timeout and bounded retry
//! - **Middleware**: Request ids, tracing, audit logging
//! - **Client**: `SubmissionTransport` implementation for the form
//! - **Error Handling**: One JSON error shape for every failure
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState, config::ProxyConfig};
//!
//! let state = AppState::new(ProxyConfig::from_env()?)?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod relay;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ProxyConfig;
use crate::handlers::{health, submit};
use crate::middleware::audit_middleware;
use crate::relay::WebhookRelay;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub relay: WebhookRelay,
}

impl AppState {
    /// Builds the state, including the pooled webhook client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let relay = WebhookRelay::new(&config)?;
        Ok(Self::with_relay(config, relay))
    }

    pub fn with_relay(config: ProxyConfig, relay: WebhookRelay) -> Self {
        Self {
            config: Arc::new(config),
            relay,
        }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Configuration and webhook relay
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let api_routes = Router::new()
        .route("/submit", post(submit::submit_claim))
        .layer(axum_middleware::from_fn(audit_middleware));

    let router = Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state);

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn cors_layer(config: &ProxyConfig) -> Option<CorsLayer> {
    let origin = config.cors_allow_origin.as_deref()?;

    match HeaderValue::from_str(origin) {
        Ok(origin) => Some(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        ),
        Err(_) => {
            warn!(origin, "Ignoring invalid CORS origin");
            None
        }
    }
}

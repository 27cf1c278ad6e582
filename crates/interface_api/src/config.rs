//! Proxy configuration
//!
//! Loaded once at startup and handed to the router; handlers never read the
//! environment themselves.

use std::time::Duration;

use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;

/// Environment variable prefix for every setting
pub const ENV_PREFIX: &str = "RECALL";

/// Proxy configuration
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct ProxyConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Workflow webhook receiving forwarded submissions
    #[validate(url)]
    pub webhook_url: Option<String>,
    /// Shared secret sent in the `x-recall-secret` header
    pub webhook_secret: Option<String>,
    /// Per-attempt timeout for the webhook call
    pub webhook_timeout_secs: u64,
    /// Extra attempts after a connectivity failure
    pub webhook_max_retries: u32,
    /// Base delay for exponential backoff between attempts
    pub webhook_retry_delay_ms: u64,
    /// Origin allowed to call the API cross-site; no CORS layer when unset
    pub cors_allow_origin: Option<String>,
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            webhook_url: None,
            webhook_secret: None,
            webhook_timeout_secs: 10,
            webhook_max_retries: 2,
            webhook_retry_delay_ms: 250,
            cors_allow_origin: None,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

/// Where and how to deliver a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookTarget {
    pub url: String,
    pub secret: String,
}

impl ProxyConfig {
    /// Loads configuration from `RECALL_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration from an environment source
    ///
    /// Values stay strings until deserialization, so a secret such as
    /// `00123` is kept as written while numeric fields still parse.
    pub fn from_environment(env: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Per-attempt webhook timeout
    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }

    /// Resolves the webhook target, failing if either setting is missing
    ///
    /// Blank values count as missing.
    pub fn webhook_target(&self) -> Result<WebhookTarget, ApiError> {
        let url = present(&self.webhook_url)
            .ok_or_else(|| ApiError::not_configured(format!("{}_WEBHOOK_URL", ENV_PREFIX)))?;
        let secret = present(&self.webhook_secret)
            .ok_or_else(|| ApiError::not_configured(format!("{}_WEBHOOK_SECRET", ENV_PREFIX)))?;

        Ok(WebhookTarget {
            url: url.to_string(),
            secret: secret.to_string(),
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

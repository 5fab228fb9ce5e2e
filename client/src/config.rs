//! Configuration management for the client.

use std::env;
use std::time::Duration;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the catalog/cart/orders API
    pub api_base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables (`.env` supported).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("SPINDLE_API_URL").map_err(|_| ConfigError::MissingApiUrl)?;
        let api_base_url = api_base_url.trim_end_matches('/').to_string();

        let request_timeout = env::var("SPINDLE_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidTimeout)?;

        Ok(Self {
            api_base_url,
            request_timeout,
        })
    }

    /// Configuration pointing at an explicit base URL, with defaults for
    /// the rest. Used by tests and embedders that skip the environment.
    pub fn for_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SPINDLE_API_URL environment variable is required")]
    MissingApiUrl,

    #[error("Invalid SPINDLE_REQUEST_TIMEOUT_SECS value")]
    InvalidTimeout,
}

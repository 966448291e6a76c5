use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default backend endpoint used when `DOCBRIDGE_API_URL` is not provided.
pub const DEFAULT_API_URL: &str = "https://api.docbridge.dev/v1";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable {key}: {reason}")]
    InvalidValue {
        /// Variable that failed validation.
        key: String,
        /// Human readable validation failure.
        reason: String,
    },
}

/// Runtime configuration for the bridge.
///
/// Built once in `main` and handed to the components that need it; nothing below the entry
/// point reads the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key sent with every backend request. `None` when the variable is unset.
    pub api_key: Option<String>,
    /// Base URL of the document-processing backend.
    pub api_url: String,
    /// Per-request timeout applied to backend calls.
    pub http_timeout: Duration,
    /// Optional path of a log file mirrored alongside stderr output.
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = load_env_optional("DOCBRIDGE_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        validate_url("DOCBRIDGE_API_URL", &api_url)?;

        let http_timeout_secs = load_env_optional("DOCBRIDGE_HTTP_TIMEOUT_SECS")
            .map(|value| {
                value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| ConfigError::InvalidValue {
                        key: "DOCBRIDGE_HTTP_TIMEOUT_SECS".into(),
                        reason: format!("expected a positive integer, got `{value}`"),
                    })
            })
            .transpose()?
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Ok(Self {
            api_key: load_env_optional("DOCBRIDGE_API_KEY"),
            api_url,
            http_timeout: Duration::from_secs(http_timeout_secs),
            log_file: load_env_optional("DOCBRIDGE_LOG_FILE").map(PathBuf::from),
        })
    }

    /// Replace the backend base URL, validating it first.
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        validate_url("--api-url", api_url)?;
        self.api_url = api_url.to_string();
        Ok(self)
    }

    /// Emit a startup warning when no API key is configured.
    ///
    /// A missing key is not fatal: requests are still attempted and fail at the backend.
    pub fn warn_if_unauthenticated(&self) {
        if self.api_key.is_none() {
            tracing::warn!(
                "DOCBRIDGE_API_KEY is not set; backend requests will be rejected until it is configured"
            );
        }
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
    reqwest::Url::parse(value)
        .map(|_| ())
        .map_err(|err| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: err.to_string(),
        })
}

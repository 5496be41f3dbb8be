//! Application configuration module
//!
//! Provides the configuration consumed by the HTTP store and the views, built
//! either programmatically through [`AppConfigBuilder`] or from a TOML file.
//!
//! ```toml
//! server_url = "https://shop.example.com/api/v1"
//! request_timeout_secs = 30
//! reconcile_delay_ms = 300
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default pause between a confirmed send and the reconciliation fetch
pub const DEFAULT_RECONCILE_DELAY: Duration = Duration::from_millis(300);

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the message API
    pub server_url: Option<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Delay before refreshing a thread after a send
    pub reconcile_delay: Duration,
    /// Bearer token attached to every request
    pub api_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            reconcile_delay: DEFAULT_RECONCILE_DELAY,
            api_token: None,
        }
    }
}

/// On-disk representation
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
    reconcile_delay_ms: Option<u64>,
    api_token: Option<String>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.server_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::MissingValue("request_timeout"));
        }
        Ok(())
    }

    /// Parse a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut builder = AppConfig::builder();
        if let Some(url) = file.server_url {
            builder = builder.server_url(url);
        }
        if let Some(secs) = file.request_timeout_secs {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        if let Some(ms) = file.reconcile_delay_ms {
            builder = builder.reconcile_delay(Duration::from_millis(ms));
        }
        if let Some(token) = file.api_token {
            builder = builder.api_token(token);
        }
        builder.build()
    }

    /// Load a TOML file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&contents)
    }

    /// `<config_dir>/courier/config.toml`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("courier").join("config.toml"))
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    request_timeout: Option<Duration>,
    reconcile_delay: Option<Duration>,
    api_token: Option<String>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the per-request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the delay between a send and its reconciliation fetch
    pub fn reconcile_delay(mut self, delay: Duration) -> Self {
        self.reconcile_delay = Some(delay);
        self
    }

    /// Set the bearer token
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            server_url: self.server_url.map(|url| url.trim_end_matches('/').to_string()),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            reconcile_delay: self.reconcile_delay.unwrap_or(DEFAULT_RECONCILE_DELAY),
            api_token: self.api_token,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid config file: {0}")]
    Parse(String),
    #[error("failed to read config: {0}")]
    Io(String),
}

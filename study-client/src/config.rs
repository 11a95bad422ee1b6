//! Client configuration.
//!
//! The API base URL comes from the environment (`STUDYHALL_API_URL`); the
//! request timeout is long (180 s) because document upload and quiz
//! generation are slow server-side operations.

use std::time::Duration;

/// Environment variable holding the API base URL.
pub const API_URL_VAR: &str = "STUDYHALL_API_URL";

/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_VAR: &str = "STUDYHALL_HTTP_TIMEOUT_SECS";

fn default_timeout() -> Duration {
    Duration::from_secs(180)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing environment variable: {name}")]
    MissingVar {
        /// Name of the missing variable.
        name: &'static str,
    },

    /// The timeout override could not be parsed as seconds.
    #[error("invalid timeout value: {value}")]
    InvalidTimeout {
        /// The unparseable value.
        value: String,
    },
}

/// Configuration for the request client and transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL without a trailing slash.
    pub base_url: String,
    /// Client-side request timeout. There is no mid-flight cancellation
    /// signal; a request outlives the screen that started it.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: default_timeout(),
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from a variable lookup. Tests inject a closure here instead of
    /// mutating the process environment.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(API_URL_VAR).ok_or(ConfigError::MissingVar {
            name: API_URL_VAR,
        })?;
        let mut config = Self::new(base_url);

        if let Some(value) = lookup(TIMEOUT_VAR) {
            let secs: u64 = value
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout { value })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

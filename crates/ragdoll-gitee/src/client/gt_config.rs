//! OCR client configuration.

use std::time::Duration;

use derive_builder::Builder;
use url::Url;

use crate::error::{Error, Result};

/// Configuration for the Gitee AI OCR client.
///
/// Covers connection settings plus the polling cadence: a fixed interval
/// between status checks and a hard attempt budget. The defaults match the
/// provider's guidance of checking every ten seconds for up to thirty
/// minutes.
#[derive(Debug, Clone, Builder)]
#[builder(
    name = "GiteeBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
pub struct GiteeConfig {
    /// Base URL for the OCR API.
    #[builder(setter(custom), default = "GiteeConfig::default_base_url()")]
    pub base_url: Url,
    /// Request timeout duration.
    #[builder(default = "Duration::from_secs(30)")]
    pub timeout: Duration,
    /// Connection timeout duration.
    #[builder(default = "Duration::from_secs(10)")]
    pub connect_timeout: Duration,
    /// Delay between status polls.
    #[builder(default = "Duration::from_secs(10)")]
    pub poll_interval: Duration,
    /// Maximum number of status polls before giving up.
    #[builder(default = "180")]
    pub max_poll_attempts: u32,
    /// User agent string for requests.
    #[builder(default = "GiteeConfig::default_user_agent()")]
    pub user_agent: String,
}

impl Default for GiteeConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_secs(10),
            max_poll_attempts: 180,
            user_agent: Self::default_user_agent(),
        }
    }
}

impl GiteeConfig {
    /// Create a new configuration builder.
    pub fn builder() -> GiteeBuilder {
        GiteeBuilder::default()
    }

    fn default_base_url() -> Url {
        "https://ai.gitee.com/v1".parse().expect("Valid default URL")
    }

    fn default_user_agent() -> String {
        format!("ragdoll-gitee/{}", env!("CARGO_PKG_VERSION"))
    }
}

impl GiteeBuilder {
    /// Set the base URL for the OCR API.
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        self.base_url =
            Some(url.parse().map_err(|e| {
                Error::invalid_config(format!("Invalid base URL '{}': {}", url, e))
            })?);
        Ok(self)
    }

    fn validate_config(&self) -> std::result::Result<(), String> {
        if let Some(timeout) = &self.timeout {
            if timeout.is_zero() {
                return Err("Timeout must be greater than 0".to_string());
            }
        }

        if let Some(connect_timeout) = &self.connect_timeout {
            if connect_timeout.is_zero() {
                return Err("Connect timeout must be greater than 0".to_string());
            }
        }

        if let Some(poll_interval) = &self.poll_interval {
            if poll_interval.is_zero() {
                return Err("Poll interval must be greater than 0".to_string());
            }
        }

        if let Some(max_poll_attempts) = &self.max_poll_attempts {
            if *max_poll_attempts == 0 {
                return Err("Max poll attempts must be greater than 0".to_string());
            }
        }

        Ok(())
    }
}

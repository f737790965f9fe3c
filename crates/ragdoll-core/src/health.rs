//! Service health reporting.
//!
//! Health probes against the OCR provider produce a status plus an optional
//! human-readable message; front ends surface both on their diagnostic
//! views.

use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Operational status of an external service.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ServiceStatus {
    /// Service is operating normally.
    #[default]
    Healthy,
    /// Service responds but with issues.
    Degraded,
    /// Service is not operational.
    Unhealthy,
}

/// Result of one health probe.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Current service status.
    pub status: ServiceStatus,
    /// Optional message describing the current state.
    pub message: Option<String>,
    /// Round-trip time of the probe.
    pub response: Option<Duration>,
    /// When the probe was performed.
    pub checked_at: Timestamp,
}

impl ServiceHealth {
    /// Creates a healthy report stamped now.
    pub fn healthy() -> Self {
        Self {
            status: ServiceStatus::Healthy,
            checked_at: Timestamp::now(),
            ..Default::default()
        }
    }

    /// Creates a degraded report with a message.
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Degraded,
            message: Some(message.into()),
            checked_at: Timestamp::now(),
            ..Default::default()
        }
    }

    /// Creates an unhealthy report with a message.
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Unhealthy,
            message: Some(message.into()),
            checked_at: Timestamp::now(),
            ..Default::default()
        }
    }

    /// Attaches the probe round-trip time.
    pub fn with_response_time(mut self, response: Duration) -> Self {
        self.response = Some(response);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let ok = ServiceHealth::healthy();
        assert_eq!(ok.status, ServiceStatus::Healthy);
        assert!(ok.message.is_none());

        let bad = ServiceHealth::unhealthy("connection refused");
        assert_eq!(bad.status, ServiceStatus::Unhealthy);
        assert_eq!(bad.message.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_response_time() {
        let health = ServiceHealth::healthy().with_response_time(Duration::from_millis(42));
        assert_eq!(health.response, Some(Duration::from_millis(42)));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ServiceStatus::Healthy.to_string(), "healthy");
        assert_eq!(ServiceStatus::Degraded.to_string(), "degraded");
    }
}

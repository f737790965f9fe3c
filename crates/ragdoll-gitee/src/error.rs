//! Error types for ragdoll-gitee.
//!
//! One enum covers the whole scan flow. Transport failures wrap the
//! underlying `reqwest` error and abort the operation; the explicit
//! "not yet terminal" poll state is the only condition that is ever retried,
//! and it is not an error.

use std::time::Duration;

use ragdoll_core::TaskStatus;

/// Result type for all OCR operations in this crate.
///
/// This is a convenience type alias that defaults to using [`Error`] as the
/// error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for OCR operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure during submission, polling or a secondary
    /// file fetch. Never retried.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The initial upload failed or returned no task identifier.
    #[error("submission failed{}: {message}", fmt_status(.status))]
    Submission {
        status: Option<u16>,
        message: String,
    },

    /// The provider reported a terminal failure or cancellation.
    #[error("task {status}: {message}")]
    TaskFailed {
        status: TaskStatus,
        message: String,
    },

    /// The attempt budget ran out before the task reached a terminal state.
    #[error("task not terminal after {attempts} polls at {interval:?} intervals")]
    PollTimeout { attempts: u32, interval: Duration },

    /// The provider returned an explicit error payload or error status.
    #[error("OCR API error: {code}: {message}")]
    Api { code: String, message: String },

    /// Serialization errors when sending or receiving data.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing errors.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid client configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}

impl Error {
    /// Creates a submission error.
    pub fn submission(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Submission {
            status,
            message: message.into(),
        }
    }

    /// Creates a task-failed error, substituting a generic message when the
    /// provider gave none.
    pub fn task_failed(status: TaskStatus, message: Option<String>) -> Self {
        Self::TaskFailed {
            status,
            message: message.unwrap_or_else(|| "no failure message provided".to_string()),
        }
    }

    /// Creates a poll timeout error.
    pub fn poll_timeout(attempts: u32, interval: Duration) -> Self {
        Self::PollTimeout { attempts, interval }
    }

    /// Creates an API error from an error payload or HTTP status.
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Get a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            Error::Http(_) => {
                "Network request failed. Please check your connection and try again.".to_string()
            }
            Error::Submission { message, .. } => {
                format!("Upload failed: {message}")
            }
            Error::TaskFailed { status, message } => {
                format!("The OCR task was {status}: {message}")
            }
            Error::PollTimeout { attempts, interval } => {
                format!(
                    "Timed out waiting for the OCR result ({attempts} checks, {}s apart).",
                    interval.as_secs()
                )
            }
            Error::Api { code, message } => {
                format!("OCR service error ({code}): {message}")
            }
            Error::InvalidConfig { reason } => format!("Configuration error: {reason}"),
            _ => "An unexpected error occurred during OCR processing.".to_string(),
        }
    }
}

// Import builder error type for From implementation
use crate::client::GiteeBuilderError;

impl From<GiteeBuilderError> for Error {
    fn from(err: GiteeBuilderError) -> Self {
        Error::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_failed_default_message() {
        let err = Error::task_failed(TaskStatus::Failed, None);
        assert_eq!(err.to_string(), "task failed: no failure message provided");

        let err = Error::task_failed(TaskStatus::Failed, Some("model overloaded".to_string()));
        assert_eq!(err.to_string(), "task failed: model overloaded");
    }

    #[test]
    fn test_submission_display() {
        let err = Error::submission(Some(401), "bad credentials");
        assert_eq!(
            err.to_string(),
            "submission failed (HTTP 401): bad credentials"
        );

        let err = Error::submission(None, "no task identifier in response");
        assert_eq!(
            err.to_string(),
            "submission failed: no task identifier in response"
        );
    }

    #[test]
    fn test_poll_timeout_display() {
        let err = Error::poll_timeout(180, Duration::from_secs(10));
        assert!(err.to_string().contains("180 polls"));
    }
}

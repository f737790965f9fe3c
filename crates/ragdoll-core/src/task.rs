//! Remote OCR task lifecycle.
//!
//! A task is a remote unit of OCR work identified by an opaque string. The
//! provider moves it through queued/running into one of the terminal states;
//! clients only ever observe status by re-fetching, never mutate it locally.

use serde::{Deserialize, Serialize};

/// Status of a remote OCR task as reported by the provider.
///
/// Upstream status strings are not a closed set; anything unrecognized maps
/// to [`TaskStatus::Unknown`] and is treated as non-terminal.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskStatus {
    /// Accepted by the provider, not yet scheduled.
    Queued,
    /// Currently being processed.
    Running,
    /// Finished with a result payload.
    Success,
    /// Finished without a result; the provider may attach a message.
    Failed,
    /// Cancelled upstream before completion.
    Cancelled,
    /// Any status string this client does not recognize.
    #[default]
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    /// Returns true if no further status transition can occur.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Cancelled)
    }

    /// Returns true if the task finished without producing a result.
    pub fn is_terminal_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(TaskStatus::Success.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(TaskStatus::Cancelled.is_terminal());

        assert!(!TaskStatus::Queued.is_terminal());
        assert!(!TaskStatus::Running.is_terminal());
        assert!(!TaskStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_terminal_failures() {
        assert!(TaskStatus::Failed.is_terminal_failure());
        assert!(TaskStatus::Cancelled.is_terminal_failure());
        assert!(!TaskStatus::Success.is_terminal_failure());
    }

    #[test]
    fn test_deserialize_known_status() {
        let status: TaskStatus = serde_json::from_str("\"running\"").unwrap();
        assert_eq!(status, TaskStatus::Running);

        let status: TaskStatus = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(status, TaskStatus::Success);
    }

    #[test]
    fn test_deserialize_unrecognized_status() {
        let status: TaskStatus = serde_json::from_str("\"warming_up\"").unwrap();
        assert_eq!(status, TaskStatus::Unknown);
        assert!(!status.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(TaskStatus::Queued.to_string(), "queued");
        assert_eq!(TaskStatus::Cancelled.to_string(), "cancelled");
    }
}

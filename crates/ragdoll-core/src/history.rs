//! Bounded scan history.
//!
//! The history log keeps the most recent completed scans, newest first, with
//! a fixed capacity. There is a single writer per log (the flow that just
//! finished a scan), so no interior locking is needed; callers that share a
//! log across tasks wrap it themselves.

use std::collections::VecDeque;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TRACING_TARGET_HISTORY;

/// Default number of entries a history log retains.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// One retained record of a completed OCR scan.
///
/// Entries are only created for scans that produced text; failed, cancelled
/// and timed-out tasks never reach the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Local identifier for this entry.
    pub id: Uuid,
    /// Remote task identifier the result came from.
    pub task_id: String,
    /// When the result was recorded.
    pub timestamp: Timestamp,
    /// Reference to the scanned image (path or URL, caller-defined).
    pub image_ref: String,
    /// Prompt the scan was submitted with.
    pub prompt: String,
    /// Extracted text.
    pub result_text: String,
}

impl HistoryEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(
        task_id: impl Into<String>,
        image_ref: impl Into<String>,
        prompt: impl Into<String>,
        result_text: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id: task_id.into(),
            timestamp: Timestamp::now(),
            image_ref: image_ref.into(),
            prompt: prompt.into(),
            result_text: result_text.into(),
        }
    }
}

/// Bounded, most-recent-first sequence of [`HistoryEntry`] values.
///
/// Pushing onto a full log evicts the oldest entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryLog {
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLog {
    /// Creates an empty log with [`DEFAULT_HISTORY_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Creates an empty log with the given capacity.
    ///
    /// A zero capacity is clamped to one so a push always records something.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Rebuilds a log from previously persisted entries, newest first.
    ///
    /// Entries beyond the capacity are dropped from the old end.
    pub fn from_entries(capacity: usize, entries: impl IntoIterator<Item = HistoryEntry>) -> Self {
        let mut log = Self::with_capacity(capacity);
        log.entries = entries.into_iter().take(log.capacity).collect();
        log
    }

    /// Records a new entry, evicting the oldest when the log is full.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == self.capacity {
            let evicted = self.entries.pop_back();
            tracing::debug!(
                target: TRACING_TARGET_HISTORY,
                evicted_id = ?evicted.map(|e| e.id),
                capacity = self.capacity,
                "history at capacity, evicted oldest entry"
            );
        }

        tracing::debug!(
            target: TRACING_TARGET_HISTORY,
            entry_id = %entry.id,
            task_id = %entry.task_id,
            "recorded history entry"
        );

        self.entries.push_front(entry);
    }

    /// Entries newest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// The most recently recorded entry, if any.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries this log retains.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

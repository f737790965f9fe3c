//! On-disk scan history.
//!
//! The history lives in one JSON file holding a serialized
//! [`HistoryLog`]; the log's capacity bound applies on every append, so the
//! file never grows past the most recent entries. Single writer: the CLI
//! process that just finished a scan.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use ragdoll_core::{HistoryEntry, HistoryLog};

use crate::TRACING_TARGET_HISTORY;

/// Capped JSON-file-backed scan history.
#[derive(Debug, Clone)]
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    /// Uses the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `$HOME/.ragdoll/history.json`, falling back to a
    /// file in the working directory when no home directory is available.
    pub fn default_path() -> PathBuf {
        match std::env::var_os("HOME") {
            Some(home) => Path::new(&home).join(".ragdoll").join("history.json"),
            None => PathBuf::from("ragdoll-history.json"),
        }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the history; a missing file is an empty log.
    pub fn load(&self) -> anyhow::Result<HistoryLog> {
        if !self.path.exists() {
            return Ok(HistoryLog::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read history file {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("malformed history file {}", self.path.display()))
    }

    /// Appends one entry and rewrites the file, evicting the oldest entry
    /// past capacity.
    pub fn append(&self, entry: HistoryEntry) -> anyhow::Result<()> {
        let mut log = self.load()?;
        log.push(entry);
        self.save(&log)
    }

    fn save(&self, log: &HistoryLog) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create history directory {}", parent.display())
                })?;
            }
        }

        let contents = serde_json::to_string_pretty(log).context("failed to encode history")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write history file {}", self.path.display()))?;

        tracing::debug!(
            target: TRACING_TARGET_HISTORY,
            path = %self.path.display(),
            entries = log.len(),
            "saved history file"
        );
        Ok(())
    }
}

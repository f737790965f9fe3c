//! Per-user profile persistence.
//!
//! The profile store is an opaque key-value collaborator holding each user's
//! saved credential and scan history. Its backing schema is out of scope
//! here; this crate only defines the trait surface that clients and front
//! ends depend on, plus an in-memory implementation for tests and
//! single-process use.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::history::{HistoryEntry, HistoryLog};
use crate::TRACING_TARGET_STORE;

/// Result type alias for profile store operations.
pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;

/// Errors surfaced by a profile store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested user has no stored profile.
    #[error("no profile found for user '{user}'")]
    NotFound { user: String },

    /// The backend rejected or failed the operation.
    #[error("profile store backend error: {reason}")]
    Backend { reason: String },
}

impl StoreError {
    /// Creates a not-found error for the given user.
    pub fn not_found(user: impl Into<String>) -> Self {
        Self::NotFound { user: user.into() }
    }

    /// Creates a backend error with the given reason.
    pub fn backend(reason: impl Into<String>) -> Self {
        Self::Backend {
            reason: reason.into(),
        }
    }
}

/// Opaque per-user credential and history storage.
///
/// Implementations may be remote tables or local files; callers treat the
/// store as a key-value service keyed by user identity. History writes go
/// through [`ProfileStore::insert_entry`], which applies the same capacity
/// bound as [`HistoryLog`].
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns the saved credential for the user, if any.
    async fn get_credential(&self, user: &str) -> StoreResult<Option<String>>;

    /// Saves or replaces the user's credential.
    async fn upsert_credential(&self, user: &str, credential: &str) -> StoreResult<()>;

    /// Returns the user's scan history, newest first.
    async fn history(&self, user: &str) -> StoreResult<Vec<HistoryEntry>>;

    /// Appends one history entry for the user, evicting the oldest past
    /// capacity.
    async fn insert_entry(&self, user: &str, entry: HistoryEntry) -> StoreResult<()>;
}

#[derive(Debug, Default)]
struct Profile {
    credential: Option<String>,
    history: HistoryLog,
}

/// In-memory [`ProfileStore`] implementation.
///
/// Suitable for tests and single-process front ends; nothing survives the
/// process.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<String, Profile>>,
}

impl MemoryProfileStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_profile<T>(&self, user: &str, f: impl FnOnce(&mut Profile) -> T) -> StoreResult<T> {
        let mut profiles = self
            .profiles
            .lock()
            .map_err(|_| StoreError::backend("profile store lock poisoned"))?;
        Ok(f(profiles.entry(user.to_string()).or_default()))
    }
}

#[async_trait::async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get_credential(&self, user: &str) -> StoreResult<Option<String>> {
        let profiles = self
            .profiles
            .lock()
            .map_err(|_| StoreError::backend("profile store lock poisoned"))?;
        Ok(profiles.get(user).and_then(|p| p.credential.clone()))
    }

    async fn upsert_credential(&self, user: &str, credential: &str) -> StoreResult<()> {
        tracing::debug!(
            target: TRACING_TARGET_STORE,
            user,
            "saving credential"
        );
        self.with_profile(user, |profile| {
            profile.credential = Some(credential.to_string());
        })
    }

    async fn history(&self, user: &str) -> StoreResult<Vec<HistoryEntry>> {
        let profiles = self
            .profiles
            .lock()
            .map_err(|_| StoreError::backend("profile store lock poisoned"))?;
        Ok(profiles
            .get(user)
            .map(|p| p.history.entries().cloned().collect())
            .unwrap_or_default())
    }

    async fn insert_entry(&self, user: &str, entry: HistoryEntry) -> StoreResult<()> {
        tracing::debug!(
            target: TRACING_TARGET_STORE,
            user,
            entry_id = %entry.id,
            "inserting history entry"
        );
        self.with_profile(user, |profile| profile.history.push(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry::new(format!("task-{n}"), "scan.png", "prompt", "text")
    }

    #[tokio::test]
    async fn test_credential_round_trip() {
        let store = MemoryProfileStore::new();

        assert_eq!(store.get_credential("alice").await.unwrap(), None);

        store.upsert_credential("alice", "key-1").await.unwrap();
        assert_eq!(
            store.get_credential("alice").await.unwrap().as_deref(),
            Some("key-1")
        );

        store.upsert_credential("alice", "key-2").await.unwrap();
        assert_eq!(
            store.get_credential("alice").await.unwrap().as_deref(),
            Some("key-2")
        );
    }

    #[tokio::test]
    async fn test_history_is_per_user_and_bounded() {
        let store = MemoryProfileStore::new();

        for n in 1..=12 {
            store.insert_entry("alice", entry(n)).await.unwrap();
        }
        store.insert_entry("bob", entry(1)).await.unwrap();

        let alice = store.history("alice").await.unwrap();
        assert_eq!(alice.len(), 10);
        assert_eq!(alice[0].task_id, "task-12");

        let bob = store.history("bob").await.unwrap();
        assert_eq!(bob.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_user_has_empty_history() {
        let store = MemoryProfileStore::new();
        assert!(store.history("nobody").await.unwrap().is_empty());
    }
}

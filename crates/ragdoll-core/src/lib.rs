#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for history log operations.
pub const TRACING_TARGET_HISTORY: &str = "ragdoll_core::history";

/// Tracing target for profile store operations.
pub const TRACING_TARGET_STORE: &str = "ragdoll_core::store";

mod health;
mod history;
mod store;
mod task;

pub use crate::health::{ServiceHealth, ServiceStatus};
pub use crate::history::{HistoryEntry, HistoryLog, DEFAULT_HISTORY_CAPACITY};
pub use crate::store::{MemoryProfileStore, ProfileStore, StoreError, StoreResult};
pub use crate::task::TaskStatus;

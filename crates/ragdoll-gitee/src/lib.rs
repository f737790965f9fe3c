#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for OCR client operations.
///
/// Use this target for logging client initialization, configuration, and
/// client-level errors.
pub const TRACING_TARGET_CLIENT: &str = "ragdoll_gitee::client";

/// Tracing target for task polling and extraction.
pub const TRACING_TARGET_TASK: &str = "ragdoll_gitee::task";

mod client;
pub mod error;
mod extract;
mod poll;
#[doc(hidden)]
pub mod prelude;
mod task;

pub use crate::client::{GiteeBuilder, GiteeClient, GiteeConfig, GiteeCredentials};
pub use crate::error::{Error, Result};
pub use crate::extract::{ExtractionResult, DIAGNOSTIC_FIELD, DIRECT_TEXT_FIELDS};
pub use crate::poll::{wait_for_result, PollEvent, TaskSource};
pub use crate::task::{
    ImageData, ImageFormat, OcrRequest, RemoteFile, TaskSnapshot, DEFAULT_MODEL,
    DEFAULT_MODEL_SIZE, DEFAULT_PROMPT,
};

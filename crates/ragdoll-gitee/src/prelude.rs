//! Prelude for the ragdoll-gitee crate.
//!
//! Re-exports the most commonly used types for a convenient single import.

pub use crate::client::{GiteeClient, GiteeConfig, GiteeCredentials};
pub use crate::error::{Error, Result};
pub use crate::extract::ExtractionResult;
pub use crate::poll::{PollEvent, TaskSource};
pub use crate::task::{ImageData, ImageFormat, OcrRequest};

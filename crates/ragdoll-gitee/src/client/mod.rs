//! Gitee AI OCR client module.
//!
//! Provides the HTTP client, its configuration builder and the credential
//! types used to authenticate against the async OCR endpoints.

mod credentials;
mod gt_client;
mod gt_config;

pub use credentials::GiteeCredentials;
pub use gt_client::GiteeClient;
pub use gt_config::{GiteeBuilder, GiteeBuilderError, GiteeConfig};

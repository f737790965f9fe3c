//! OCR client implementation.
//!
//! This module provides the main client interface for the Gitee AI async
//! OCR endpoints: multipart submission, task state fetches, secondary
//! output-file fetches and the provider health probe.

use std::time::Instant;

use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpClient, ClientBuilder};
use ragdoll_core::ServiceHealth;
use serde::Deserialize;

use super::{GiteeConfig, GiteeCredentials};
use crate::error::{Error, Result};
use crate::extract::ExtractionResult;
use crate::poll::{wait_for_result, PollEvent, TaskSource};
use crate::task::{OcrRequest, RemoteFile, SubmitResponse, TaskSnapshot};
use crate::TRACING_TARGET_CLIENT;

/// Client for the Gitee AI asynchronous OCR service.
///
/// The client owns one pooled HTTP connection set and holds no per-request
/// state, so independent scans through clones of the same client cannot
/// interfere with each other.
///
/// # Examples
///
/// ```rust,ignore
/// use ragdoll_gitee::{GiteeClient, GiteeConfig, GiteeCredentials};
/// use std::time::Duration;
///
/// let config = GiteeConfig::builder()
///     .with_timeout(Duration::from_secs(30))
///     .build()?;
///
/// let credentials = GiteeCredentials::bearer("your-api-key");
/// let client = GiteeClient::new(config, credentials)?;
/// ```
#[derive(Debug, Clone)]
pub struct GiteeClient {
    http_client: HttpClient,
    config: GiteeConfig,
    credentials: GiteeCredentials,
}

#[derive(Debug, Default, Deserialize)]
struct HealthProbe {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl GiteeClient {
    /// Create a new OCR client with the given configuration and
    /// credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: GiteeConfig, credentials: GiteeCredentials) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            base_url = %config.base_url,
            "Creating OCR client"
        );

        let http_client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            http_client,
            config,
            credentials,
        })
    }

    /// Create a client with default configuration and a bearer token.
    pub fn with_token(token: impl Into<String>) -> Result<Self> {
        Self::new(GiteeConfig::default(), GiteeCredentials::bearer(token))
    }

    /// Get the client configuration.
    pub fn config(&self) -> &GiteeConfig {
        &self.config
    }

    /// Joins a relative path onto the configured base URL.
    ///
    /// Plain string concatenation on purpose: `Url::join` would drop the
    /// `/v1` path segment for absolute inputs.
    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.as_str().trim_end_matches('/'),
            path
        )
    }

    /// Submit an image for OCR and return the opaque task identifier.
    ///
    /// A non-2xx response or a success body without a task identifier fails
    /// with [`Error::Submission`]. There is no retry.
    pub async fn submit(&self, request: &OcrRequest) -> Result<String> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            model = %request.model,
            model_size = %request.model_size,
            filename = %request.image.filename,
            image_bytes = request.image.bytes.len(),
            "Submitting OCR task"
        );

        let image_part = Part::bytes(request.image.bytes.to_vec())
            .file_name(request.image.filename.clone())
            .mime_str(request.image.format.mime_type())?;

        let form = Form::new()
            .text("model", request.model.clone())
            .text("prompt", request.prompt.clone())
            .text("model_size", request.model_size.clone())
            .part("image", image_part);

        let response = self
            .credentials
            .apply(self.http_client.post(self.endpoint("async/images/ocr")))
            .header("X-Failover-Enabled", "true")
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "no response body".to_string());
            tracing::error!(
                target: TRACING_TARGET_CLIENT,
                status = status.as_u16(),
                message,
                "OCR submission rejected"
            );
            return Err(Error::submission(Some(status.as_u16()), message));
        }

        let body: SubmitResponse = response.json().await?;
        let task_id = body
            .task_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::submission(None, "response contained no task identifier"))?;

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            task_id = %task_id,
            "OCR task submitted"
        );

        Ok(task_id)
    }

    /// Run the full scan flow: submit, poll until terminal, extract.
    ///
    /// Progress is reported through `on_event`; see
    /// [`wait_for_result`] for the polling contract. Returns the task
    /// identifier alongside the extracted text.
    pub async fn process<F>(
        &self,
        request: &OcrRequest,
        on_event: F,
    ) -> Result<(String, ExtractionResult)>
    where
        F: FnMut(PollEvent),
    {
        let task_id = self.submit(request).await?;
        let result = wait_for_result(
            self,
            &task_id,
            self.config.poll_interval,
            self.config.max_poll_attempts,
            on_event,
        )
        .await?;
        Ok((task_id, result))
    }

    /// Probe the provider's health endpoint.
    ///
    /// The probe consumes the provider's `{status, message}` payload; an
    /// unreachable or erroring endpoint maps to an unhealthy report rather
    /// than a client error.
    pub async fn health_check(&self) -> Result<ServiceHealth> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            "Performing health check"
        );

        let start = Instant::now();
        let response = self
            .credentials
            .apply(self.http_client.get(self.endpoint("health")))
            .send()
            .await?;
        let elapsed = start.elapsed();

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "no response body".to_string());
            return Ok(
                ServiceHealth::unhealthy(format!("HTTP {}: {}", status.as_u16(), message))
                    .with_response_time(elapsed),
            );
        }

        let probe: HealthProbe = response.json().await.unwrap_or_default();
        let health = match probe.status.as_deref() {
            Some("ok") | Some("healthy") => {
                let mut health = ServiceHealth::healthy();
                health.message = probe.message;
                health
            }
            Some(other) => ServiceHealth::degraded(
                probe
                    .message
                    .unwrap_or_else(|| format!("provider reported status '{other}'")),
            ),
            None => ServiceHealth::degraded("provider returned no status field"),
        };

        Ok(health.with_response_time(elapsed))
    }
}

#[async_trait::async_trait]
impl TaskSource for GiteeClient {
    async fn fetch_task(&self, task_id: &str) -> Result<TaskSnapshot> {
        let response = self
            .credentials
            .apply(
                self.http_client
                    .get(self.endpoint(&format!("task/{task_id}"))),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "no response body".to_string());
            return Err(Error::api(status.as_u16().to_string(), message));
        }

        Ok(response.json().await?)
    }

    async fn fetch_output_file(&self, url: &str) -> Result<RemoteFile> {
        // Result files are served from signed URLs; no auth header.
        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::api(
                status.as_u16().to_string(),
                format!("output file fetch failed for {url}"),
            ));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok());
        let body = response.text().await?;

        Ok(RemoteFile { content_type, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joining() {
        let client = GiteeClient::with_token("k").unwrap();
        assert_eq!(
            client.endpoint("task/abc"),
            "https://ai.gitee.com/v1/task/abc"
        );
        assert_eq!(
            client.endpoint("async/images/ocr"),
            "https://ai.gitee.com/v1/async/images/ocr"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash_base() {
        let config = GiteeConfig::builder()
            .with_base_url("https://ocr.example.com/v2/")
            .unwrap()
            .build()
            .unwrap();
        let client = GiteeClient::new(config, GiteeCredentials::none()).unwrap();
        assert_eq!(client.endpoint("health"), "https://ocr.example.com/v2/health");
    }
}

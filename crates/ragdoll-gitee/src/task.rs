//! Wire types for the Gitee AI async OCR endpoints.
//!
//! The submission side is stable; the task status payload is not. The status
//! response is modeled with every field optional and the output kept as a
//! raw JSON map so that extraction (see `extract`) can probe it with an
//! ordered list of strategies instead of scattering conditionals.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use mime::Mime;
use ragdoll_core::TaskStatus;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Default OCR model submitted with requests.
pub const DEFAULT_MODEL: &str = "DeepSeek-OCR";

/// Default model size variant.
pub const DEFAULT_MODEL_SIZE: &str = "Gundam";

/// Default grounding prompt for document-to-markdown conversion.
pub const DEFAULT_PROMPT: &str = "<image>\n<|grounding|>Convert the document to markdown.";

/// Image formats accepted for submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG format
    Jpeg,
    /// PNG format
    Png,
    /// WebP format
    WebP,
}

impl ImageFormat {
    /// Get the MIME type for this image format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// Detect format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg => write!(f, "JPEG"),
            Self::Png => write!(f, "PNG"),
            Self::WebP => write!(f, "WebP"),
        }
    }
}

/// Image payload for one submission.
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Raw image bytes.
    pub bytes: Bytes,
    /// Filename forwarded in the multipart part.
    pub filename: String,
    /// Image format, used for the part's content type.
    pub format: ImageFormat,
}

impl ImageData {
    /// Creates an image payload.
    pub fn new(bytes: impl Into<Bytes>, filename: impl Into<String>, format: ImageFormat) -> Self {
        Self {
            bytes: bytes.into(),
            filename: filename.into(),
            format,
        }
    }
}

/// One OCR submission: an image plus the model and prompt it is processed
/// with.
#[derive(Debug, Clone)]
pub struct OcrRequest {
    /// Model identifier, e.g. [`DEFAULT_MODEL`].
    pub model: String,
    /// Model size variant, e.g. [`DEFAULT_MODEL_SIZE`].
    pub model_size: String,
    /// Prompt guiding the extraction.
    pub prompt: String,
    /// The image to recognize.
    pub image: ImageData,
}

impl OcrRequest {
    /// Creates a request with the default model, size and prompt.
    pub fn new(image: ImageData) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            model_size: DEFAULT_MODEL_SIZE.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            image,
        }
    }

    /// Overrides the prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Overrides the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the model size variant.
    pub fn with_model_size(mut self, model_size: impl Into<String>) -> Self {
        self.model_size = model_size.into();
        self
    }
}

/// Body of a successful submission response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SubmitResponse {
    #[serde(default)]
    pub task_id: Option<String>,
}

/// Snapshot of a remote task as returned by the status endpoint.
///
/// Every field is optional on the wire; an absent status maps to
/// [`TaskStatus::Unknown`] and keeps the poll loop going.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskSnapshot {
    /// Reported task status.
    #[serde(default)]
    pub status: TaskStatus,
    /// Explicit error payload; its presence aborts polling immediately.
    #[serde(default)]
    pub error: Option<String>,
    /// Human-readable message accompanying errors or failures.
    #[serde(default)]
    pub message: Option<String>,
    /// Processing start, epoch milliseconds.
    #[serde(default)]
    pub started_at: Option<f64>,
    /// Processing end, epoch milliseconds.
    #[serde(default)]
    pub completed_at: Option<f64>,
    /// Provider-defined output object; schema varies across deployments.
    #[serde(default)]
    pub output: Option<Map<String, Value>>,
}

impl TaskSnapshot {
    /// Processing duration, when the provider reported both timestamps.
    pub fn duration(&self) -> Option<Duration> {
        let (started, completed) = (self.started_at?, self.completed_at?);
        let millis = completed - started;
        if millis.is_finite() && millis >= 0.0 {
            Some(Duration::from_secs_f64(millis / 1000.0))
        } else {
            None
        }
    }
}

/// Body and negotiated content type of a secondary output-file fetch.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    /// Content type from the response headers, if parseable.
    pub content_type: Option<Mime>,
    /// Response body as text.
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let image = ImageData::new(vec![1, 2, 3], "scan.png", ImageFormat::Png);
        let request = OcrRequest::new(image);

        assert_eq!(request.model, "DeepSeek-OCR");
        assert_eq!(request.model_size, "Gundam");
        assert!(request.prompt.contains("markdown"));
    }

    #[test]
    fn test_request_overrides() {
        let image = ImageData::new(vec![1], "scan.jpg", ImageFormat::Jpeg);
        let request = OcrRequest::new(image)
            .with_prompt("<image>\nExtract the table.")
            .with_model_size("Tiny");

        assert_eq!(request.model_size, "Tiny");
        assert_eq!(request.prompt, "<image>\nExtract the table.");
    }

    #[test]
    fn test_image_format_detection() {
        assert_eq!(ImageFormat::from_extension("jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("webp"), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_extension("gif"), None);
    }

    #[test]
    fn test_snapshot_duration() {
        let snapshot = TaskSnapshot {
            started_at: Some(1_000.0),
            completed_at: Some(3_500.0),
            ..Default::default()
        };
        assert_eq!(snapshot.duration(), Some(Duration::from_millis(2_500)));
    }

    #[test]
    fn test_snapshot_duration_missing_or_negative() {
        let snapshot = TaskSnapshot::default();
        assert_eq!(snapshot.duration(), None);

        let snapshot = TaskSnapshot {
            started_at: Some(2_000.0),
            completed_at: Some(1_000.0),
            ..Default::default()
        };
        assert_eq!(snapshot.duration(), None);
    }

    #[test]
    fn test_snapshot_deserializes_sparse_payload() {
        let snapshot: TaskSnapshot = serde_json::from_str(r#"{"status":"running"}"#).unwrap();
        assert_eq!(snapshot.status, TaskStatus::Running);
        assert!(snapshot.error.is_none());
        assert!(snapshot.output.is_none());
    }

    #[test]
    fn test_snapshot_defaults_unknown_status() {
        let snapshot: TaskSnapshot = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(snapshot.status, TaskStatus::Unknown);
    }
}

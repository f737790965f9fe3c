//! Result extraction from the unstable task output schema.
//!
//! Providers have shipped at least three shapes for the success payload: a
//! downloadable file reference, a handful of direct text fields, and a
//! generic result/data wrapper. Extraction tries an ordered list of
//! strategies and stops at the first match; when nothing matches it degrades
//! to a diagnostic dump of the available fields so a successful task always
//! yields something visible.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::poll::TaskSource;
use crate::task::{RemoteFile, TaskSnapshot};
use crate::TRACING_TARGET_TASK;

/// Direct text fields probed on the task output, in priority order.
pub const DIRECT_TEXT_FIELDS: [&str; 4] = ["text_result", "text", "markdown", "content"];

/// Generic wrapper fields probed after the direct text fields.
const GENERIC_FIELDS: [&str; 2] = ["result", "data"];

/// Field name reported when no strategy matched and the diagnostic fallback
/// produced the text.
pub const DIAGNOSTIC_FIELD: &str = "diagnostic";

/// Text recovered from a terminal success response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// The extracted text.
    pub text: String,
    /// Which output field the text came from ("file_url", one of
    /// [`DIRECT_TEXT_FIELDS`], "result", "data", or [`DIAGNOSTIC_FIELD`]).
    pub source_field: String,
}

impl ExtractionResult {
    fn new(text: impl Into<String>, source_field: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_field: source_field.into(),
        }
    }

    /// Returns true when the text is a diagnostic dump rather than an OCR
    /// result.
    pub fn is_diagnostic(&self) -> bool {
        self.source_field == DIAGNOSTIC_FIELD
    }
}

/// Extracts the text result from a success snapshot.
///
/// Strategies, first match wins:
/// 1. `output.file_url` - one secondary fetch through `source`; JSON bodies
///    are re-serialized, anything else is taken as raw text.
/// 2. Direct text fields ([`DIRECT_TEXT_FIELDS`]), string values only,
///    returned verbatim.
/// 3. A generic `result`/`data` field, serialized when not already a string.
///
/// A miss never fails: the fallback enumerates the top-level output fields.
/// The only error paths are a transport failure on the secondary fetch and
/// an unparseable JSON body there.
pub(crate) async fn extract_text<S>(source: &S, snapshot: &TaskSnapshot) -> Result<ExtractionResult>
where
    S: TaskSource + ?Sized,
{
    let Some(output) = snapshot.output.as_ref() else {
        tracing::warn!(
            target: TRACING_TARGET_TASK,
            "success response carried no output object"
        );
        return Ok(diagnostic(None));
    };

    if let Some(url) = output.get("file_url").and_then(Value::as_str) {
        tracing::debug!(
            target: TRACING_TARGET_TASK,
            url,
            "fetching result from output file reference"
        );
        let file = source.fetch_output_file(url).await?;
        return Ok(ExtractionResult::new(render_remote_file(&file)?, "file_url"));
    }

    for field in DIRECT_TEXT_FIELDS {
        if let Some(text) = output.get(field).and_then(Value::as_str) {
            return Ok(ExtractionResult::new(text, field));
        }
    }

    for field in GENERIC_FIELDS {
        if let Some(value) = output.get(field) {
            let text = match value {
                Value::String(text) => text.clone(),
                other => serde_json::to_string_pretty(other)?,
            };
            return Ok(ExtractionResult::new(text, field));
        }
    }

    tracing::warn!(
        target: TRACING_TARGET_TASK,
        fields = ?output.keys().collect::<Vec<_>>(),
        "no recognized text field in task output"
    );
    Ok(diagnostic(Some(output)))
}

/// Renders a secondary fetch body: structured content is re-serialized to
/// readable text, everything else passes through unchanged.
fn render_remote_file(file: &RemoteFile) -> Result<String> {
    let is_json = file.content_type.as_ref().is_some_and(|mime| {
        mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON)
    });

    if is_json {
        let value: Value = serde_json::from_str(&file.body)?;
        Ok(serde_json::to_string_pretty(&value)?)
    } else {
        Ok(file.body.clone())
    }
}

fn diagnostic(output: Option<&Map<String, Value>>) -> ExtractionResult {
    let text = match output {
        Some(output) if !output.is_empty() => {
            let fields: Vec<&str> = output.keys().map(String::as_str).collect();
            format!(
                "Task succeeded but no recognized text field was found. \
                 Available output fields: {}",
                fields.join(", ")
            )
        }
        _ => "Task succeeded but the response carried no output object.".to_string(),
    };
    ExtractionResult::new(text, DIAGNOSTIC_FIELD)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;
    use crate::error::Error;

    /// Task source that serves canned files and never expects a status
    /// fetch.
    #[derive(Default)]
    struct FileOnlySource {
        files: HashMap<String, RemoteFile>,
    }

    impl FileOnlySource {
        fn with_file(url: &str, content_type: Option<&str>, body: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(
                url.to_string(),
                RemoteFile {
                    content_type: content_type.map(|ct| ct.parse().unwrap()),
                    body: body.to_string(),
                },
            );
            Self { files }
        }
    }

    #[async_trait::async_trait]
    impl TaskSource for FileOnlySource {
        async fn fetch_task(&self, _task_id: &str) -> Result<TaskSnapshot> {
            panic!("extraction must not re-fetch task state");
        }

        async fn fetch_output_file(&self, url: &str) -> Result<RemoteFile> {
            self.files
                .get(url)
                .cloned()
                .ok_or_else(|| Error::api("404", format!("no such file: {url}")))
        }
    }

    fn snapshot_with_output(output: Value) -> TaskSnapshot {
        TaskSnapshot {
            output: Some(output.as_object().unwrap().clone()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_direct_text_fields_verbatim() {
        let source = FileOnlySource::default();

        for field in DIRECT_TEXT_FIELDS {
            let snapshot = snapshot_with_output(json!({ field: "Hello" }));
            let result = extract_text(&source, &snapshot).await.unwrap();
            assert_eq!(result.text, "Hello");
            assert_eq!(result.source_field, field);
        }
    }

    #[tokio::test]
    async fn test_direct_field_priority_order() {
        let source = FileOnlySource::default();
        let snapshot = snapshot_with_output(json!({
            "markdown": "from markdown",
            "text_result": "from text_result",
        }));

        let result = extract_text(&source, &snapshot).await.unwrap();
        assert_eq!(result.source_field, "text_result");
        assert_eq!(result.text, "from text_result");
    }

    #[tokio::test]
    async fn test_file_url_wins_over_direct_fields() {
        let source =
            FileOnlySource::with_file("https://files.test/r.md", Some("text/markdown"), "# Title");
        let snapshot = snapshot_with_output(json!({
            "file_url": "https://files.test/r.md",
            "text": "inline text",
        }));

        let result = extract_text(&source, &snapshot).await.unwrap();
        assert_eq!(result.source_field, "file_url");
        assert_eq!(result.text, "# Title");
    }

    #[tokio::test]
    async fn test_file_url_json_body_reserialized() {
        let source = FileOnlySource::with_file(
            "https://files.test/r.json",
            Some("application/json"),
            r#"{"pages":[{"text":"Hi"}]}"#,
        );
        let snapshot = snapshot_with_output(json!({ "file_url": "https://files.test/r.json" }));

        let result = extract_text(&source, &snapshot).await.unwrap();
        assert_eq!(result.source_field, "file_url");
        // Pretty-printed, so it spans lines and keeps the content.
        assert!(result.text.contains('\n'));
        assert!(result.text.contains("\"text\": \"Hi\""));
    }

    #[tokio::test]
    async fn test_file_url_fetch_failure_aborts() {
        let source = FileOnlySource::default();
        let snapshot = snapshot_with_output(json!({ "file_url": "https://files.test/gone" }));

        let err = extract_text(&source, &snapshot).await.unwrap_err();
        assert!(matches!(err, Error::Api { .. }));
    }

    #[tokio::test]
    async fn test_generic_result_field() {
        let source = FileOnlySource::default();

        let snapshot = snapshot_with_output(json!({ "result": "plain result" }));
        let result = extract_text(&source, &snapshot).await.unwrap();
        assert_eq!(result.text, "plain result");
        assert_eq!(result.source_field, "result");

        let snapshot = snapshot_with_output(json!({ "data": {"nested": true} }));
        let result = extract_text(&source, &snapshot).await.unwrap();
        assert_eq!(result.source_field, "data");
        assert!(result.text.contains("\"nested\": true"));
    }

    #[tokio::test]
    async fn test_diagnostic_fallback_lists_fields() {
        let source = FileOnlySource::default();
        let snapshot = snapshot_with_output(json!({ "pages": 3, "format": "v2" }));

        let result = extract_text(&source, &snapshot).await.unwrap();
        assert!(result.is_diagnostic());
        assert!(!result.text.is_empty());
        assert!(result.text.contains("pages"));
        assert!(result.text.contains("format"));
    }

    #[tokio::test]
    async fn test_diagnostic_fallback_without_output() {
        let source = FileOnlySource::default();
        let snapshot = TaskSnapshot::default();

        let result = extract_text(&source, &snapshot).await.unwrap();
        assert!(result.is_diagnostic());
        assert!(!result.text.is_empty());
    }
}

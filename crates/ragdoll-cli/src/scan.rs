//! The `scan` flow: submit an image, wait for the result, record it.

use std::path::Path;

use anyhow::Context;
use ragdoll_core::HistoryEntry;
use ragdoll_gitee::{GiteeClient, ImageData, ImageFormat, OcrRequest, PollEvent};

use crate::config::{ProviderArgs, ScanArgs};
use crate::history::HistoryFile;
use crate::TRACING_TARGET_SCAN;

/// Runs one scan end to end and prints or writes the extracted text.
pub async fn run(provider: &ProviderArgs, args: &ScanArgs) -> anyhow::Result<()> {
    let client = provider.client(true)?;
    let request = build_request(&args.image, args).await?;
    let prompt = request.prompt.clone();

    tracing::info!(
        target: TRACING_TARGET_SCAN,
        image = %args.image.display(),
        model = %request.model,
        "submitting image for recognition"
    );

    let (task_id, result) = client
        .process(&request, report_progress)
        .await
        .with_context(|| format!("scan of {} failed", args.image.display()))?;

    if result.is_diagnostic() {
        eprintln!(
            "warning: no recognized text field in the task output; showing diagnostics instead"
        );
    }

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &result.text)
                .await
                .with_context(|| format!("failed to write result to {}", path.display()))?;
            eprintln!("result written to {}", path.display());
        }
        None => println!("{}", result.text),
    }

    if !result.is_diagnostic() {
        let history = HistoryFile::new(
            provider
                .history_file
                .clone()
                .unwrap_or_else(HistoryFile::default_path),
        );
        let entry = HistoryEntry::new(
            &task_id,
            args.image.display().to_string(),
            prompt,
            &result.text,
        );
        history.append(entry).context("failed to record history")?;
    }

    Ok(())
}

/// Loads the image and assembles the request with any CLI overrides.
async fn build_request(image_path: &Path, args: &ScanArgs) -> anyhow::Result<OcrRequest> {
    let extension = image_path
        .extension()
        .and_then(|ext| ext.to_str())
        .with_context(|| format!("{} has no file extension", image_path.display()))?;
    let format = ImageFormat::from_extension(extension).with_context(|| {
        format!("unsupported image format '{extension}'; expected jpg, png or webp")
    })?;

    let bytes = tokio::fs::read(image_path)
        .await
        .with_context(|| format!("failed to read {}", image_path.display()))?;
    let filename = image_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();

    let mut request = OcrRequest::new(ImageData::new(bytes, filename, format));
    if let Some(prompt) = &args.prompt {
        request = request.with_prompt(prompt);
    }
    if let Some(model) = &args.model {
        request = request.with_model(model);
    }
    if let Some(model_size) = &args.model_size {
        request = request.with_model_size(model_size);
    }
    Ok(request)
}

/// Writes poll progress to stderr so stdout stays clean for the result.
fn report_progress(event: PollEvent) {
    match event {
        PollEvent::Attempt {
            attempt,
            max_attempts,
        } => eprintln!("checking task status ({attempt}/{max_attempts})..."),
        PollEvent::StatusChanged(status) => eprintln!("task status: {status}"),
        PollEvent::Completed { duration_ms } => match duration_ms {
            Some(ms) => eprintln!("task completed in {:.1}s", ms as f64 / 1000.0),
            None => eprintln!("task completed"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use ragdoll_gitee::{DEFAULT_MODEL, DEFAULT_PROMPT};

    fn scan_args(image: &str) -> ScanArgs {
        ScanArgs {
            image: PathBuf::from(image),
            prompt: None,
            model: None,
            model_size: None,
            output: None,
        }
    }

    #[tokio::test]
    async fn test_build_request_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.png");
        tokio::fs::write(&path, b"fake image bytes").await.unwrap();

        let args = scan_args(path.to_str().unwrap());
        let request = build_request(&path, &args).await.unwrap();

        assert_eq!(request.model, DEFAULT_MODEL);
        assert_eq!(request.prompt, DEFAULT_PROMPT);
        assert_eq!(request.image.filename, "invoice.png");
        assert_eq!(request.image.format, ImageFormat::Png);
    }

    #[tokio::test]
    async fn test_build_request_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.jpg");
        tokio::fs::write(&path, b"fake image bytes").await.unwrap();

        let mut args = scan_args(path.to_str().unwrap());
        args.prompt = Some("extract the table".to_string());
        args.model_size = Some("Tiny".to_string());

        let request = build_request(&path, &args).await.unwrap();
        assert_eq!(request.prompt, "extract the table");
        assert_eq!(request.model_size, "Tiny");
    }

    #[tokio::test]
    async fn test_build_request_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        tokio::fs::write(&path, b"plain text").await.unwrap();

        let args = scan_args(path.to_str().unwrap());
        let error = build_request(&path, &args).await.unwrap_err();
        assert!(error.to_string().contains("unsupported image format"));
    }

    #[tokio::test]
    async fn test_build_request_missing_file() {
        let path = PathBuf::from("/nonexistent/image.png");
        let args = scan_args("/nonexistent/image.png");
        assert!(build_request(&path, &args).await.is_err());
    }
}

//! Fixed-interval task polling.
//!
//! One logical flow per task: fetch the status, act on terminal states,
//! otherwise sleep the interval and try again until the attempt budget runs
//! out. The loop holds no shared state; progress is observable only through
//! the caller's event callback, and the history side effect belongs to the
//! caller of [`wait_for_result`].

use std::time::Duration;

use ragdoll_core::TaskStatus;

use crate::error::{Error, Result};
use crate::extract::{extract_text, ExtractionResult};
use crate::task::{RemoteFile, TaskSnapshot};
use crate::TRACING_TARGET_TASK;

/// Source of task state and secondary output files.
///
/// [`crate::GiteeClient`] is the production implementation; tests script
/// their own.
#[async_trait::async_trait]
pub trait TaskSource: Send + Sync {
    /// Fetches the current state of the task.
    async fn fetch_task(&self, task_id: &str) -> Result<TaskSnapshot>;

    /// Fetches an output file referenced by the task state.
    async fn fetch_output_file(&self, url: &str) -> Result<RemoteFile>;
}

/// Progress events emitted while waiting for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    /// A poll attempt is about to run.
    Attempt { attempt: u32, max_attempts: u32 },
    /// The reported status differs from the previous attempt.
    StatusChanged(TaskStatus),
    /// The task succeeded; extraction follows.
    Completed {
        /// Processing time reported by the provider, when available.
        /// Stored as whole milliseconds to stay `Eq`.
        duration_ms: Option<u64>,
    },
}

/// Polls `task_id` until it reaches a terminal state, then extracts the
/// text result.
///
/// The loop runs at most `max_attempts` fetches spaced by `interval`;
/// `on_event` fires once per attempt and once per status transition.
/// Explicit error payloads, terminal failures and transport errors abort
/// immediately; only "not yet terminal" is retried. An exhausted budget
/// yields [`Error::PollTimeout`].
///
/// On success the extraction strategies of [`crate::ExtractionResult`] run;
/// an extraction miss degrades to a diagnostic result instead of failing,
/// so a successful task always produces visible text.
pub async fn wait_for_result<S, F>(
    source: &S,
    task_id: &str,
    interval: Duration,
    max_attempts: u32,
    mut on_event: F,
) -> Result<ExtractionResult>
where
    S: TaskSource + ?Sized,
    F: FnMut(PollEvent),
{
    let mut last_status = None;

    for attempt in 1..=max_attempts {
        on_event(PollEvent::Attempt {
            attempt,
            max_attempts,
        });

        let snapshot = source.fetch_task(task_id).await?;

        if let Some(error) = &snapshot.error {
            let message = snapshot
                .message
                .clone()
                .unwrap_or_else(|| "unknown error".to_string());
            tracing::error!(
                target: TRACING_TARGET_TASK,
                task_id,
                error,
                message,
                "status endpoint returned an error payload"
            );
            return Err(Error::api(error, message));
        }

        if last_status != Some(snapshot.status) {
            on_event(PollEvent::StatusChanged(snapshot.status));
            last_status = Some(snapshot.status);
        }

        tracing::debug!(
            target: TRACING_TARGET_TASK,
            task_id,
            attempt,
            max_attempts,
            status = %snapshot.status,
            "polled task state"
        );

        match snapshot.status {
            TaskStatus::Success => {
                let duration = snapshot.duration();
                tracing::info!(
                    target: TRACING_TARGET_TASK,
                    task_id,
                    attempt,
                    duration = ?duration,
                    "task succeeded"
                );
                on_event(PollEvent::Completed {
                    duration_ms: duration.map(|d| d.as_millis() as u64),
                });
                return extract_text(source, &snapshot).await;
            }
            status if status.is_terminal_failure() => {
                tracing::error!(
                    target: TRACING_TARGET_TASK,
                    task_id,
                    status = %status,
                    message = ?snapshot.message,
                    "task reached terminal failure state"
                );
                return Err(Error::task_failed(status, snapshot.message));
            }
            _ => tokio::time::sleep(interval).await,
        }
    }

    tracing::error!(
        target: TRACING_TARGET_TASK,
        task_id,
        max_attempts,
        interval = ?interval,
        "attempt budget exhausted without a terminal state"
    );
    Err(Error::poll_timeout(max_attempts, interval))
}

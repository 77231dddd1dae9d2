//! Batch mode: one task over many files with bounded concurrency.

use futures_util::{StreamExt, stream};
use learnkit::{Assistant, Generation, Hook, TaskKind, Transport};
use serde::Serialize;
use std::path::PathBuf;

/// Outcome for one input file.
#[derive(Debug, Serialize)]
pub struct BatchItem {
    /// The input file.
    pub file: PathBuf,
    /// The generation, or why it failed.
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

/// Success or failure of one file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    Ok(Generation),
    Error(String),
}

/// Run `task` over every file, at most `jobs` at a time.
///
/// Items come back in completion order. A failing file never aborts the
/// others.
pub async fn run<H: Hook, T: Transport>(
    assistant: &Assistant<H, T>,
    task: TaskKind,
    files: Vec<PathBuf>,
    jobs: usize,
) -> Vec<BatchItem> {
    let total = files.len();
    let items = stream::iter(files)
        .map(|file| async move {
            let outcome = match tokio::fs::read_to_string(&file).await {
                Ok(text) => match assistant.generate(task, &text, None).await {
                    Ok(generation) => BatchOutcome::Ok(generation),
                    Err(e) => BatchOutcome::Error(e.to_string()),
                },
                Err(e) => BatchOutcome::Error(format!("failed to read {}: {e}", file.display())),
            };
            BatchItem { file, outcome }
        })
        .buffer_unordered(jobs.max(1))
        .collect::<Vec<_>>()
        .await;

    let failed = items
        .iter()
        .filter(|item| matches!(item.outcome, BatchOutcome::Error(_)))
        .count();
    tracing::info!("{task} batch finished: {} ok, {failed} failed", total - failed);
    items
}

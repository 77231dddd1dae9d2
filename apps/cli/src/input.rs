//! Reading task input from files or stdin.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Read the text at `path`, or stdin when `path` is absent or `-`.
pub async fn read(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display())),
        _ => read_stream(tokio::io::stdin())
            .await
            .context("failed to read stdin"),
    }
}

/// Read a whole stream as UTF-8 text.
pub async fn read_stream(mut reader: impl AsyncRead + Unpin) -> std::io::Result<String> {
    let mut text = String::new();
    reader.read_to_string(&mut text).await?;
    Ok(text)
}

/// Read optional context text; nothing is read when `path` is absent.
pub async fn context(path: Option<&Path>) -> Result<Option<String>> {
    match path {
        Some(path) => read(Some(path)).await.map(Some),
        None => Ok(None),
    }
}

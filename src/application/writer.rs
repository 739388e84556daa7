use std::io;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::warn;

use super::progress::ProgressSink;
use crate::api::{FetchError, ResponseHandle};
use crate::domain::TransferProgress;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    #[error("Write error: {0}")]
    Io(String),

    #[error(transparent)]
    Transfer(#[from] FetchError),
}

impl From<io::Error> for WriteError {
    fn from(err: io::Error) -> Self {
        WriteError::Io(err.to_string())
    }
}

/// Percentage of `total` covered by `received`, rounded to the nearest integer.
pub fn percent(received: u64, total: u64) -> u8 {
    let pct = (received as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Streams the response body into `destination`, reporting progress per chunk.
///
/// Resolves only after the file has been flushed and closed. On failure the
/// partially written file is removed.
pub async fn write_stream<S: ProgressSink>(
    response: ResponseHandle,
    destination: &Path,
    sink: &S,
) -> Result<PathBuf, WriteError> {
    let file = tokio::fs::File::create(destination).await.map_err(|e| {
        WriteError::Io(format!(
            "Failed to create {}: {}",
            destination.display(),
            e
        ))
    })?;

    write_into(file, response, destination, sink).await
}

/// Body of `write_stream` once the destination is open.
pub(crate) async fn write_into<W, S>(
    mut writer: W,
    response: ResponseHandle,
    destination: &Path,
    sink: &S,
) -> Result<PathBuf, WriteError>
where
    W: AsyncWrite + Unpin,
    S: ProgressSink,
{
    let total = response.content_length().filter(|&t| t > 0);

    match copy_body(&mut writer, response, total, sink).await {
        Ok(()) => {
            drop(writer);
            Ok(destination.to_path_buf())
        }
        Err(e) => {
            drop(writer);
            remove_partial(destination).await;
            Err(e)
        }
    }
}

async fn copy_body<W, S>(
    writer: &mut W,
    response: ResponseHandle,
    total: Option<u64>,
    sink: &S,
) -> Result<(), WriteError>
where
    W: AsyncWrite + Unpin,
    S: ProgressSink,
{
    let mut body = response.body;
    let mut received: u64 = 0;

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk).await?;

        received += chunk.len() as u64;
        let progress = match total {
            Some(total) => TransferProgress::Percent(percent(received, total)),
            None => TransferProgress::Indeterminate,
        };
        sink.progress(progress);
    }

    writer.flush().await?;
    writer.shutdown().await?;
    Ok(())
}

async fn remove_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), "failed to remove partial download: {}", e),
    }
}

use crate::api::FetchError;
use crate::application::writer::WriteError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Could not locate the downloads folder")]
    NoDownloadsDir,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server responded with status {0}")]
    BadStatus(u16),

    #[error("Too many redirects (limit {0})")]
    TooManyRedirects(usize),

    #[error("Write error: {0}")]
    Write(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Download stopped unexpectedly: {0}")]
    Aborted(String),
}

impl From<FetchError> for DownloadError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Network(msg) => DownloadError::Network(msg),
            FetchError::InvalidUrl(msg) => DownloadError::Network(format!("Invalid URL: {}", msg)),
            FetchError::BadStatus(code) => DownloadError::BadStatus(code),
            FetchError::TooManyRedirects(limit) => DownloadError::TooManyRedirects(limit),
        }
    }
}

impl From<WriteError> for DownloadError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Io(msg) => DownloadError::Write(msg),
            WriteError::Transfer(err) => err.into(),
        }
    }
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use super::progress::ProgressSink;
use super::writer::write_stream;
use crate::{
    api::{Fetcher, HttpFetcher, LauncherConfig},
    domain::{DownloadError, DownloadOutcome, DownloadPhase, PlatformKey},
};

/// Hands a finished download to the operating system.
pub trait FileOpener: Send + Sync {
    fn open(&self, path: &Path) -> Result<(), DownloadError>;
}

/// Opens files with the desktop's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl FileOpener for SystemOpener {
    fn open(&self, path: &Path) -> Result<(), DownloadError> {
        open::that_detached(path).map_err(|e| DownloadError::OpenFailed(e.to_string()))
    }
}

#[derive(Clone)]
pub struct DownloadCoordinator<F = HttpFetcher, O = SystemOpener> {
    config: Arc<LauncherConfig>,
    fetcher: F,
    opener: O,
    downloads_dir: Option<PathBuf>,
}

impl<F: Fetcher, O: FileOpener> DownloadCoordinator<F, O> {
    pub fn new(
        config: Arc<LauncherConfig>,
        fetcher: F,
        opener: O,
        downloads_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            config,
            fetcher,
            opener,
            downloads_dir,
        }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Downloads the installer for `platform_key` and opens it.
    ///
    /// Runs resolve, fetch, write and open in sequence, reporting each phase
    /// and every received chunk to `sink`. Errors from any stage are returned
    /// as-is; a failure to open the finished file is only a warning on the
    /// outcome.
    pub async fn download<S: ProgressSink>(
        &self,
        platform_key: &str,
        sink: &S,
    ) -> Result<DownloadOutcome, DownloadError> {
        sink.phase(DownloadPhase::Resolving);

        let result = self.run(platform_key, sink).await;
        match &result {
            Ok(outcome) => {
                info!(path = %outcome.path.display(), "download finished");
                sink.phase(DownloadPhase::Done);
            }
            Err(e) => {
                warn!(platform = platform_key, "download failed: {}", e);
                sink.phase(DownloadPhase::Failed);
            }
        }
        result
    }

    async fn run<S: ProgressSink>(
        &self,
        platform_key: &str,
        sink: &S,
    ) -> Result<DownloadOutcome, DownloadError> {
        let key: PlatformKey = platform_key.parse()?;
        let target = self
            .config
            .target(key)
            .ok_or_else(|| DownloadError::UnsupportedPlatform(platform_key.to_string()))?;
        let destination = self
            .downloads_dir
            .as_deref()
            .ok_or(DownloadError::NoDownloadsDir)?
            .join(&target.file_name);

        info!(platform = %key, url = %target.source_url, "fetching installer");
        sink.phase(DownloadPhase::Fetching);
        let response = self.fetcher.fetch(&target.source_url).await?;

        info!(
            from = %response.url,
            status = response.status,
            to = %destination.display(),
            "writing installer"
        );
        sink.phase(DownloadPhase::Writing);
        let path = write_stream(response, &destination, sink).await?;

        sink.phase(DownloadPhase::Opening);
        let open_warning = match self.opener.open(&path) {
            Ok(()) => None,
            Err(e) => {
                warn!(path = %path.display(), "{}", e);
                Some(e)
            }
        };

        Ok(DownloadOutcome { path, open_warning })
    }
}

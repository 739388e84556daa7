use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::warn;

use super::download_coordinator::{DownloadCoordinator, FileOpener, SystemOpener};
use super::progress::ProgressEvent;
use crate::{
    api::{Fetcher, HttpFetcher},
    domain::{DownloadError, DownloadOutcome, DownloadPhase, PlatformKey, TransferProgress},
    utils,
};

type DownloadResult = Result<DownloadOutcome, DownloadError>;

/// What the front end sees of a running download.
#[derive(Debug, Clone)]
pub enum BridgeEvent {
    Phase(DownloadPhase),
    Progress(TransferProgress),
    /// Always the last event of a download
    Finished(DownloadResult),
}

impl From<ProgressEvent> for BridgeEvent {
    fn from(event: ProgressEvent) -> Self {
        match event {
            ProgressEvent::Phase(phase) => BridgeEvent::Phase(phase),
            ProgressEvent::Transfer(progress) => BridgeEvent::Progress(progress),
        }
    }
}

/// Surface exposed to the UI: platform detection and download invocation.
pub struct LauncherBridge<F = HttpFetcher, O = SystemOpener> {
    coordinator: Arc<DownloadCoordinator<F, O>>,
}

impl<F, O> Clone for LauncherBridge<F, O> {
    fn clone(&self) -> Self {
        Self {
            coordinator: Arc::clone(&self.coordinator),
        }
    }
}

impl<F, O> LauncherBridge<F, O>
where
    F: Fetcher + 'static,
    O: FileOpener + 'static,
{
    pub fn new(coordinator: DownloadCoordinator<F, O>) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
        }
    }

    pub fn product_name(&self) -> &str {
        &self.coordinator.config().product_name
    }

    /// Host OS identifier, e.g. `win32` or `darwin`
    pub fn get_platform(&self) -> &'static str {
        utils::host_platform()
    }

    /// Installer the UI should suggest for this machine
    pub fn default_platform(&self) -> Option<PlatformKey> {
        utils::default_platform(self.get_platform())
    }

    /// Starts a download and returns its event stream.
    ///
    /// The download runs as its own tokio task once the stream is first
    /// polled, and progress is buffered without bound, so a slow consumer
    /// never stalls the transfer. The stream ends right after `Finished`.
    pub fn download_installer(&self, platform_key: impl Into<String>) -> BoxStream<'static, BridgeEvent> {
        let state = BridgeState::Pending {
            coordinator: Arc::clone(&self.coordinator),
            platform_key: platform_key.into(),
        };

        futures::stream::unfold(state, |state| async move {
            match state {
                BridgeState::Pending {
                    coordinator,
                    platform_key,
                } => {
                    let (tx, rx) = mpsc::unbounded_channel();
                    // The task owns `tx`; the channel closes when it returns
                    let handle = tokio::spawn(async move {
                        coordinator.download(&platform_key, &tx).await
                    });
                    relay(rx, handle).await
                }
                BridgeState::Relaying { rx, handle } => relay(rx, handle).await,
                BridgeState::Finished => None,
            }
        })
        .boxed()
    }
}

enum BridgeState<F, O> {
    Pending {
        coordinator: Arc<DownloadCoordinator<F, O>>,
        platform_key: String,
    },
    Relaying {
        rx: UnboundedReceiver<ProgressEvent>,
        handle: JoinHandle<DownloadResult>,
    },
    Finished,
}

/// Forwards queued events until the download task closes the channel, then
/// emits its result.
async fn relay<F, O>(
    mut rx: UnboundedReceiver<ProgressEvent>,
    handle: JoinHandle<DownloadResult>,
) -> Option<(BridgeEvent, BridgeState<F, O>)> {
    match rx.recv().await {
        Some(event) => Some((event.into(), BridgeState::Relaying { rx, handle })),
        None => {
            let result = handle.await.unwrap_or_else(|e| {
                warn!("download task did not complete: {}", e);
                Err(DownloadError::Aborted(e.to_string()))
            });
            Some((BridgeEvent::Finished(result), BridgeState::Finished))
        }
    }
}

use tokio::sync::mpsc::UnboundedSender;

use crate::domain::{DownloadPhase, TransferProgress};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Phase(DownloadPhase),
    Transfer(TransferProgress),
}

/// Receives notifications from a running download.
///
/// Implementations must return immediately; the transfer calls these inline
/// between chunks.
pub trait ProgressSink {
    fn progress(&self, progress: TransferProgress);

    fn phase(&self, _phase: DownloadPhase) {}
}

impl ProgressSink for UnboundedSender<ProgressEvent> {
    fn progress(&self, progress: TransferProgress) {
        // A closed receiver just means nobody is watching any more
        let _ = self.send(ProgressEvent::Transfer(progress));
    }

    fn phase(&self, phase: DownloadPhase) {
        let _ = self.send(ProgressEvent::Phase(phase));
    }
}

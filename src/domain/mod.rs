pub mod error;
pub mod model;

pub use error::DownloadError;
pub use model::{DownloadOutcome, DownloadPhase, DownloadTarget, PlatformKey, TransferProgress};

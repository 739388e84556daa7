pub mod bridge;
pub mod download_coordinator;
pub mod progress;
pub mod writer;

pub use bridge::{BridgeEvent, LauncherBridge};
pub use download_coordinator::{DownloadCoordinator, SystemOpener};

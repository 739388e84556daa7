use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::error::DownloadError;

/// Installer flavour requested by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlatformKey {
    Win,
    Mac,
}

impl PlatformKey {
    pub const ALL: [PlatformKey; 2] = [PlatformKey::Win, PlatformKey::Mac];

    pub fn as_str(self) -> &'static str {
        match self {
            PlatformKey::Win => "win",
            PlatformKey::Mac => "mac",
        }
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformKey {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win" => Ok(PlatformKey::Win),
            "mac" => Ok(PlatformKey::Mac),
            other => Err(DownloadError::UnsupportedPlatform(other.to_string())),
        }
    }
}

/// Where an installer comes from and what it is called on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub source_url: String,
    pub file_name: String,
}

/// A single progress notification: an integer percent, or no figure at all
/// when the total size is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferProgress {
    Percent(u8),
    Indeterminate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadPhase {
    Idle,
    Resolving,
    Fetching,
    Writing,
    Opening,
    Done,
    Failed,
}

/// Result of a successful download.
///
/// The file is on disk regardless of `open_warning`; a failed launch of the
/// installer is reported here rather than as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadOutcome {
    pub path: PathBuf,
    pub open_warning: Option<DownloadError>,
}

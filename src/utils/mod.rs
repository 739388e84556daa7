use std::path::PathBuf;

use crate::domain::PlatformKey;

/// Host OS in the naming the front end uses (`win32`, `darwin`, `linux`)
pub fn host_platform() -> &'static str {
    match std::env::consts::OS {
        "windows" => "win32",
        "macos" => "darwin",
        other => other,
    }
}

/// Installer matching a host OS identifier, if there is one
pub fn default_platform(host: &str) -> Option<PlatformKey> {
    match host {
        "win32" => Some(PlatformKey::Win),
        "darwin" => Some(PlatformKey::Mac),
        _ => None,
    }
}

/// The user's downloads folder, falling back to `~/Downloads`
pub fn downloads_dir() -> Option<PathBuf> {
    dirs::download_dir().or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
}

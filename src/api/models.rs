use std::collections::BTreeMap;
use std::time::Duration;

use crate::domain::{DownloadTarget, PlatformKey};

const PRODUCT_NAME: &str = "NTOU_Tools";
const RELEASE_BASE: &str = "https://github.com/cookieyu2000/NTOU_Line_chart/releases/latest/download";

/// Configuration for the launcher, fixed at build time
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    pub product_name: String,
    pub targets: BTreeMap<PlatformKey, DownloadTarget>,
    pub max_redirects: usize,
    pub connect_timeout: Duration,
    /// Longest wait for the next chunk of a response
    pub read_timeout: Duration,
    pub user_agent: String,
}

impl LauncherConfig {
    pub fn target(&self, key: PlatformKey) -> Option<&DownloadTarget> {
        self.targets.get(&key)
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        let targets = PlatformKey::ALL
            .into_iter()
            .map(|key| {
                let file_name = match key {
                    PlatformKey::Win => format!("{}_Setup.exe", PRODUCT_NAME),
                    PlatformKey::Mac => format!("{}.dmg", PRODUCT_NAME),
                };
                let target = DownloadTarget {
                    source_url: format!("{}/{}", RELEASE_BASE, file_name),
                    file_name,
                };
                (key, target)
            })
            .collect();

        Self {
            product_name: PRODUCT_NAME.to_string(),
            targets,
            max_redirects: 20,
            connect_timeout: Duration::from_secs(15),
            read_timeout: Duration::from_secs(60),
            user_agent: format!("ntou-launcher/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

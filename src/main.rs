mod api;
mod app;
mod application;
mod domain;
mod ui;
mod utils;

use std::sync::Arc;

use iced::{window, Size};

use api::{HttpFetcher, LauncherConfig};
use application::{DownloadCoordinator, LauncherBridge, SystemOpener};

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = LauncherConfig::default();
    let fetcher = match HttpFetcher::new(&config) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            tracing::error!("Failed to set up HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let downloads_dir = utils::downloads_dir();
    tracing::info!(
        product = %config.product_name,
        downloads = ?downloads_dir,
        "Starting launcher"
    );

    let coordinator =
        DownloadCoordinator::new(Arc::new(config), fetcher, SystemOpener, downloads_dir);
    let bridge = LauncherBridge::new(coordinator);

    iced::application(
        move || app::LauncherApp::new(bridge.clone()),
        app::update,
        app::view,
    )
    .title(app::title)
    .window(window::Settings {
        size: Size::new(720.0, 520.0),
        resizable: false,
        ..Default::default()
    })
    .run()
}

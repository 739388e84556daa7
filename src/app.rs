use crate::application::{BridgeEvent, LauncherBridge};
use crate::domain::{DownloadPhase, PlatformKey, TransferProgress};
use crate::ui::{LauncherMessage, LauncherView};
use iced::Task;

pub struct LauncherApp {
    view: LauncherView,
    bridge: LauncherBridge,
}

impl LauncherApp {
    pub fn new(bridge: LauncherBridge) -> Self {
        let view = LauncherView::new(bridge.product_name(), bridge.default_platform());
        Self { view, bridge }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(LauncherMessage),
    /// Events relayed from a running download
    Bridge(BridgeEvent),
}

pub fn title(app: &LauncherApp) -> String {
    format!("{} Launcher", app.bridge.product_name())
}

fn start_download(app: &mut LauncherApp, key: PlatformKey) -> Task<Message> {
    // Buttons are disabled while busy, but a queued press can still arrive
    if app.view.is_downloading {
        return Task::none();
    }

    app.view.is_downloading = true;
    app.view.phase = DownloadPhase::Idle;
    app.view.progress = Some(TransferProgress::Percent(0));
    app.view.status_message = "Downloading... this may take a moment.".to_string();

    Task::stream(app.bridge.download_installer(key.as_str())).map(Message::Bridge)
}

pub fn update(app: &mut LauncherApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(LauncherMessage::DownloadPressed(key)) => {
            return start_download(app, key);
        }
        Message::Bridge(BridgeEvent::Progress(progress)) => {
            if app.view.is_downloading {
                app.view.progress = Some(progress);
            }
        }
        Message::Bridge(BridgeEvent::Phase(phase)) => {
            app.view.phase = phase;
            if phase == DownloadPhase::Opening {
                app.view.status_message = "Opening installer...".to_string();
            }
        }
        Message::Bridge(BridgeEvent::Finished(result)) => {
            app.view.is_downloading = false;
            match result {
                Ok(outcome) => {
                    app.view.status_message = match outcome.open_warning {
                        None => format!("Downloaded to: {}", outcome.path.display()),
                        Some(e) => format!("Downloaded to: {} ({})", outcome.path.display(), e),
                    };
                }
                Err(e) => {
                    app.view.status_message = format!("Download failed: {}", e);
                }
            }
        }
    }
    Task::none()
}

pub fn view(app: &LauncherApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::*;
    use crate::api::{HttpFetcher, LauncherConfig};
    use crate::application::{DownloadCoordinator, SystemOpener};
    use crate::domain::{DownloadError, DownloadOutcome};

    fn app() -> LauncherApp {
        let config = LauncherConfig::default();
        let fetcher = HttpFetcher::new(&config).unwrap();
        let coordinator = DownloadCoordinator::new(
            Arc::new(config),
            fetcher,
            SystemOpener,
            Some(PathBuf::from("/tmp/downloads")),
        );
        LauncherApp::new(LauncherBridge::new(coordinator))
    }

    #[test]
    fn test_title() {
        assert_eq!(title(&app()), "NTOU_Tools Launcher");
    }

    #[test]
    fn test_press_marks_busy() {
        let mut app = app();
        let _ = update(
            &mut app,
            Message::UiMessage(LauncherMessage::DownloadPressed(PlatformKey::Win)),
        );

        assert!(app.view.is_downloading);
        assert_eq!(app.view.phase, DownloadPhase::Idle);
        assert_eq!(app.view.progress, Some(TransferProgress::Percent(0)));
        assert_eq!(
            app.view.status_message,
            "Downloading... this may take a moment."
        );
    }

    #[test]
    fn test_second_download_resets_phase() {
        let mut app = app();
        app.view.phase = DownloadPhase::Done;
        app.view.status_message = "Downloaded to: /tmp/downloads/NTOU_Tools.dmg".to_string();

        let _ = update(
            &mut app,
            Message::UiMessage(LauncherMessage::DownloadPressed(PlatformKey::Mac)),
        );

        assert!(app.view.is_downloading);
        assert_eq!(app.view.phase, DownloadPhase::Idle);
    }

    #[test]
    fn test_progress_updates_view() {
        let mut app = app();
        app.view.is_downloading = true;

        let _ = update(
            &mut app,
            Message::Bridge(BridgeEvent::Progress(TransferProgress::Percent(40))),
        );
        assert_eq!(app.view.progress, Some(TransferProgress::Percent(40)));

        let _ = update(
            &mut app,
            Message::Bridge(BridgeEvent::Progress(TransferProgress::Indeterminate)),
        );
        assert_eq!(app.view.progress, Some(TransferProgress::Indeterminate));
    }

    #[test]
    fn test_phase_updates_view() {
        let mut app = app();
        app.view.is_downloading = true;

        let _ = update(
            &mut app,
            Message::Bridge(BridgeEvent::Phase(DownloadPhase::Opening)),
        );
        assert_eq!(app.view.phase, DownloadPhase::Opening);
        assert_eq!(app.view.status_message, "Opening installer...");
    }

    #[test]
    fn test_finished_success() {
        let mut app = app();
        app.view.is_downloading = true;

        let outcome = DownloadOutcome {
            path: PathBuf::from("/tmp/downloads/NTOU_Tools.dmg"),
            open_warning: None,
        };
        let _ = update(&mut app, Message::Bridge(BridgeEvent::Finished(Ok(outcome))));

        assert!(!app.view.is_downloading);
        assert_eq!(
            app.view.status_message,
            "Downloaded to: /tmp/downloads/NTOU_Tools.dmg"
        );
    }

    #[test]
    fn test_finished_with_open_warning() {
        let mut app = app();
        app.view.is_downloading = true;

        let outcome = DownloadOutcome {
            path: PathBuf::from("/tmp/downloads/NTOU_Tools.dmg"),
            open_warning: Some(DownloadError::OpenFailed("no handler".to_string())),
        };
        let _ = update(&mut app, Message::Bridge(BridgeEvent::Finished(Ok(outcome))));

        assert!(app.view.status_message.starts_with("Downloaded to: "));
        assert!(app.view.status_message.contains("no handler"));
    }

    #[test]
    fn test_finished_failure() {
        let mut app = app();
        app.view.is_downloading = true;

        let _ = update(
            &mut app,
            Message::Bridge(BridgeEvent::Finished(Err(DownloadError::BadStatus(404)))),
        );

        assert!(!app.view.is_downloading);
        assert_eq!(
            app.view.status_message,
            "Download failed: Server responded with status 404"
        );
    }
}

use iced::{
    widget::{button, column, progress_bar, row, text, Space},
    Alignment, Element, Length,
};

use crate::domain::{DownloadPhase, PlatformKey, TransferProgress};

/// Main view state
pub struct LauncherView {
    pub product_name: String,
    pub status_message: String,
    pub is_downloading: bool,
    pub phase: DownloadPhase,
    /// `None` until the first download starts
    pub progress: Option<TransferProgress>,
    /// Installer highlighted for this machine
    pub suggested: Option<PlatformKey>,
}

impl LauncherView {
    pub fn new(product_name: impl Into<String>, suggested: Option<PlatformKey>) -> Self {
        Self {
            product_name: product_name.into(),
            status_message: "Choose the installer for your computer".to_string(),
            is_downloading: false,
            phase: DownloadPhase::Idle,
            progress: None,
            suggested,
        }
    }
}

#[derive(Debug, Clone)]
pub enum LauncherMessage {
    DownloadPressed(PlatformKey),
}

impl LauncherView {
    fn download_button(&self, key: PlatformKey) -> Element<'_, LauncherMessage> {
        let label = match key {
            PlatformKey::Win => "Download for Windows",
            PlatformKey::Mac => "Download for Mac",
        };
        let style = if self.suggested == Some(key) {
            button::primary
        } else {
            button::secondary
        };

        button(text(label).size(16))
            .on_press_maybe((!self.is_downloading).then_some(LauncherMessage::DownloadPressed(key)))
            .style(style)
            .padding([10, 20])
            .into()
    }

    pub fn view(&self) -> Element<'_, LauncherMessage> {
        let buttons = row![
            self.download_button(PlatformKey::Win),
            self.download_button(PlatformKey::Mac),
        ]
        .spacing(16);

        let progress: Element<'_, LauncherMessage> = match self.progress {
            Some(_) if self.phase == DownloadPhase::Fetching => column![
                progress_bar(0.0..=100.0, 0.0),
                text("Connecting...").size(12),
            ]
            .spacing(4)
            .into(),
            Some(TransferProgress::Percent(p)) => column![
                progress_bar(0.0..=100.0, f32::from(p)),
                text(format!("{}%", p)).size(12),
            ]
            .spacing(4)
            .into(),
            // Size unknown: no meaningful fill level to show
            Some(TransferProgress::Indeterminate) => column![
                progress_bar(0.0..=100.0, 0.0),
                text("Downloading (size unknown)").size(12),
            ]
            .spacing(4)
            .into(),
            None => Space::new().height(Length::Fixed(0.0)).into(),
        };

        column![
            text(format!("{} Installer", self.product_name)).size(32),
            Space::new().height(Length::Fixed(20.0)),
            buttons,
            Space::new().height(Length::Fixed(20.0)),
            progress,
            text(&self.status_message).size(14),
        ]
        .align_x(Alignment::Center)
        .padding(20)
        .spacing(10)
        .into()
    }
}

//! Terminal Status Display: one line per state change, latest wins.

use chrono::{DateTime, Local};
use jobtrack_core::{AppViewModel, DownloadDescriptor, Severity, StatusMessage};

pub fn status_line(status: &StatusMessage, at: DateTime<Local>) -> String {
    let tag = match status.severity {
        Severity::Neutral => "    ",
        Severity::Ok => " ok ",
        Severity::Error => "ERR ",
    };
    format!("[{}] {}{}", at.format("%H:%M:%S"), tag, status.text)
}

pub fn download_lines(downloads: &DownloadDescriptor) -> Vec<String> {
    downloads
        .links
        .iter()
        .map(|link| format!("  {}: {}", link.artifact, link.url))
        .collect()
}

/// Lines to print for a changed view. Empty when the status text is unchanged.
pub fn render(
    view: &AppViewModel,
    previous: Option<&StatusMessage>,
    at: DateTime<Local>,
) -> Vec<String> {
    if previous == Some(&view.status) || view.status.text.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![status_line(&view.status, at)];
    if let Some(downloads) = &view.downloads {
        lines.extend(download_lines(downloads));
    }
    lines
}

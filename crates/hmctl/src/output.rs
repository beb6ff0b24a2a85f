//! Terminal rendering of notifications.

use hmclient::{Notification, NotificationSink, Severity};
use owo_colors::OwoColorize;

/// Prints notifications to stderr, colored by severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl NotificationSink for StderrSink {
    fn notify(&self, notification: Notification) {
        eprintln!("{}", render(&notification));
    }
}

pub fn render(notification: &Notification) -> String {
    match notification.severity {
        Severity::Error => format!("{} {}", "✗".red().bold(), notification.message.red()),
        Severity::Warning => format!("{} {}", "!".yellow().bold(), notification.message.yellow()),
        Severity::Info => format!("{} {}", "•".cyan(), notification.message),
    }
}

/*!
 * User-facing notifications.
 *
 * Rejected translation requests are reported to whoever drives the
 * translation (an editor UI, an operator console) through a `Notifier`.
 * How the message is displayed is up to the implementation.
 */

use log::{error, info, warn};
use parking_lot::Mutex;
use std::fmt;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A human-readable message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Optional heading
    pub title: String,
    /// Message body
    pub message: String,
    /// Severity
    pub severity: Severity,
}

impl Notification {
    /// Informational notification without a title
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            message: message.into(),
            severity: Severity::Info,
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Sink for user-facing notifications
pub trait Notifier: Send + Sync {
    /// Deliver a notification; must not fail
    fn notify(&self, notification: Notification);
}

/// Notifier that writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        let text = if notification.title.is_empty() {
            notification.message
        } else {
            format!("{}: {}", notification.title, notification.message)
        };

        match notification.severity {
            Severity::Info => info!("{}", text),
            Severity::Warning => warn!("{}", text),
            Severity::Error => error!("{}", text),
        }
    }
}

/// Notifier that keeps messages in memory until taken
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the queued notifications
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.messages.lock())
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.messages.lock().push(notification);
    }
}

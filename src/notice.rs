//! Transient user-facing notifications.
//!
//! Every failed call to the hosted service surfaces as a short error notice
//! for the user and a `tracing` diagnostic for developers. Nothing is
//! retried and errors are not classified beyond "failed".

use std::sync::{Arc, PoisonError, RwLock};
use tracing::{error, info};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// An operation completed.
    Success,
    /// An operation failed.
    Error,
}

/// A short message shown to the user and then dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    level: NoticeLevel,
    message: String,
}

impl Notice {
    /// Creates a success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Creates an error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Returns the notice severity.
    #[must_use]
    pub const fn level(&self) -> NoticeLevel {
        self.level
    }

    /// Returns the message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Sink for user-facing notices.
pub trait Notifier: Send + Sync {
    /// Shows a notice to the user.
    fn notify(&self, notice: Notice);
}

/// Notifier that records notices in memory, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<RwLock<Vec<Notice>>>,
}

impl RecordingNotifier {
    /// Creates an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every notice received so far.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the most recent notice.
    #[must_use]
    pub fn last(&self) -> Option<Notice> {
        self.notices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

/// Notifier that writes notices to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level() {
            NoticeLevel::Success => info!(notice = notice.message(), "notice"),
            NoticeLevel::Error => error!(notice = notice.message(), "notice"),
        }
    }
}

/// Logs a failed remote call and shows `message` to the user.
pub(crate) fn report_failure<N>(notifier: &N, message: &str, err: &dyn std::error::Error)
where
    N: Notifier + ?Sized,
{
    error!(error = %err, "{message}");
    notifier.notify(Notice::error(message));
}

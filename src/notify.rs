//! User-facing transient notifications
//!
//! Every failure surfaced by [`crate::StageTools`] ends up here, as does
//! confirmation of successful imports. The host decides how to display them.

use std::sync::Mutex;
use std::time::Duration;

use log::{info, warn};

use crate::config::NotificationConfig;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

/// A message shown to the user for a limited time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub duration: Duration,
}

impl Notification {
    pub fn info(message: impl Into<String>, config: &NotificationConfig) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
            duration: Duration::from_secs(config.info_secs),
        }
    }

    pub fn warning(message: impl Into<String>, config: &NotificationConfig) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
            duration: Duration::from_secs(config.warning_secs),
        }
    }
}

/// Sink for notifications
pub trait Notifier: Send + Sync {
    fn post(&self, notification: Notification);
}

/// Writes notifications through the `log` facade
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn post(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => info!("{} ({:?})", notification.message, notification.duration),
            Severity::Warning => warn!("{} ({:?})", notification.message, notification.duration),
        }
    }
}

/// Collects notifications in memory
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    posted: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything posted so far, oldest first
    pub fn notifications(&self) -> Vec<Notification> {
        self.posted
            .lock()
            .map(|posted| posted.clone())
            .unwrap_or_default()
    }

    pub fn warnings(&self) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(|n| n.severity == Severity::Warning)
            .collect()
    }

    /// Remove and return everything posted so far
    pub fn drain(&self) -> Vec<Notification> {
        self.posted
            .lock()
            .map(|mut posted| std::mem::take(&mut *posted))
            .unwrap_or_default()
    }
}

impl Notifier for MemoryNotifier {
    fn post(&self, notification: Notification) {
        if let Ok(mut posted) = self.posted.lock() {
            posted.push(notification);
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn post(&self, notification: Notification) {
        (**self).post(notification)
    }
}

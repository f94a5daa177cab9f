//! User-facing notifications (the toasts of the storefront UI).
//!
//! Sinks are fire-and-forget: `notify` cannot fail, so a broken sink never
//! aborts the state change that produced the message.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            kind,
            message: message.into(),
            subscriber_id: None,
            created_at: at,
        }
    }

    pub fn for_subscriber(mut self, subscriber_id: impl Into<String>) -> Self {
        self.subscriber_id = Some(subscriber_id.into());
        self
    }
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Logs every notification and keeps the most recent ones in memory for the
/// admin console.
#[derive(Clone)]
pub struct NotificationCenter {
    recent: Arc<Mutex<VecDeque<Notification>>>,
    capacity: usize,
}

impl NotificationCenter {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            recent: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Newest first.
    pub fn recent(&self) -> Vec<Notification> {
        let guard = match self.recent.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.iter().rev().cloned().collect()
    }
}

impl NotificationSink for NotificationCenter {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => log::error!("notification: {}", notification.message),
            NotificationKind::Warning => log::warn!("notification: {}", notification.message),
            _ => log::info!("notification: {}", notification.message),
        }
        let mut guard = match self.recent.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.len() == self.capacity {
            guard.pop_front();
        }
        guard.push_back(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_center_is_bounded_and_newest_first() {
        let center = NotificationCenter::new(2);
        let now = Utc::now();
        center.notify(Notification::new(NotificationKind::Info, "one", now));
        center.notify(Notification::new(NotificationKind::Success, "two", now));
        center.notify(Notification::new(NotificationKind::Error, "three", now).for_subscriber("uid-9"));

        let recent = center.recent();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].message, "three");
        assert_eq!(recent[0].subscriber_id.as_deref(), Some("uid-9"));
        assert_eq!(recent[1].message, "two");
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let center = NotificationCenter::new(0);
        center.notify(Notification::new(NotificationKind::Warning, "kept", Utc::now()));
        assert_eq!(center.recent().len(), 1);
    }
}

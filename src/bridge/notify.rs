//! User-facing notifications (toasts).

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Message shown after a successful broadcast.
pub const SUCCESS_MESSAGE: &str = "Transaction Done";

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "message", rename_all = "snake_case")]
pub enum Notification {
    Success(String),
    Failure(String),
}

/// Sink for notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// A notification with the time it was raised.
#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub at_unix_ms: u64,
    pub notification: Notification,
}

/// Keeps the most recent toasts for the dashboard to show.
#[derive(Debug)]
pub struct ToastFeed {
    capacity: usize,
    toasts: Mutex<VecDeque<Toast>>,
}

impl ToastFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            toasts: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Newest first.
    pub fn recent(&self) -> Vec<Toast> {
        match self.toasts.lock() {
            Ok(toasts) => toasts.iter().rev().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().rev().cloned().collect(),
        }
    }
}

impl Default for ToastFeed {
    fn default() -> Self {
        Self::new(32)
    }
}

impl Notifier for ToastFeed {
    fn notify(&self, notification: Notification) {
        match &notification {
            Notification::Success(message) => tracing::info!(toast = %message, "Success toast"),
            Notification::Failure(message) => tracing::warn!(toast = %message, "Failure toast"),
        }

        let toast = Toast {
            at_unix_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64,
            notification,
        };

        let mut toasts = match self.toasts.lock() {
            Ok(toasts) => toasts,
            Err(poisoned) => poisoned.into_inner(),
        };
        if toasts.len() == self.capacity {
            toasts.pop_front();
        }
        toasts.push_back(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_is_bounded_newest_first() {
        let feed = ToastFeed::new(2);
        feed.notify(Notification::Success("one".to_string()));
        feed.notify(Notification::Failure("two".to_string()));
        feed.notify(Notification::Success("three".to_string()));

        let recent: Vec<_> = feed.recent().into_iter().map(|t| t.notification).collect();
        assert_eq!(
            recent,
            vec![
                Notification::Success("three".to_string()),
                Notification::Failure("two".to_string()),
            ]
        );
    }

    #[test]
    fn test_toast_json_shape() {
        let toast = Toast {
            at_unix_ms: 1,
            notification: Notification::Failure("boom".to_string()),
        };
        let json = serde_json::to_value(&toast).unwrap();
        assert_eq!(json["notification"]["level"], "failure");
        assert_eq!(json["notification"]["message"], "boom");
    }
}

//! User-visible notifications.
//!
//! Every user action ends in exactly one [`Notification`]: a success message,
//! or a destructive one carrying the error. Front ends decide how to show
//! them by supplying a [`Notifier`].

use std::sync::{Mutex, PoisonError};

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Success,
    Info,
    Destructive,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: Option<String>,
    pub variant: Variant,
}

impl Notification {
    #[must_use]
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant: Variant::Success,
        }
    }

    #[must_use]
    pub fn info(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant: Variant::Info,
        }
    }

    #[must_use]
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: Some(description.into()),
            variant: Variant::Destructive,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Sink for notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Logs notifications through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let description = notification.description.as_deref().unwrap_or_default();
        match notification.variant {
            Variant::Destructive => {
                tracing::error!(title = %notification.title, %description, "Notification");
            }
            Variant::Success | Variant::Info => {
                tracing::info!(title = %notification.title, %description, "Notification");
            }
        }
    }
}

/// Collects notifications in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    received: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain everything received so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.received.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Received notifications of one variant.
    #[must_use]
    pub fn of_variant(&self, variant: Variant) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(|n| n.variant == variant)
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_notifier_records_in_order() {
        let notifier = MemoryNotifier::new();
        notifier.notify(Notification::success("Added to cart"));
        notifier.notify(Notification::destructive("Error", "Network down"));

        assert_eq!(notifier.of_variant(Variant::Destructive).len(), 1);
        let all = notifier.take();
        assert_eq!(all.len(), 2);
        assert_eq!(all.first().map(|n| n.title.as_str()), Some("Added to cart"));
        assert!(notifier.notifications().is_empty());
    }
}

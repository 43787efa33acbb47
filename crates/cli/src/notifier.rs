//! Terminal toasts.

use shopfront_client::{Notification, Notifier, Variant};

/// Prints notifications to stderr, one line each.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    #[allow(clippy::print_stderr)]
    fn notify(&self, notification: Notification) {
        let marker = match notification.variant {
            Variant::Success => "✓",
            Variant::Info => "•",
            Variant::Destructive => "✗",
        };
        match notification.description {
            Some(description) => eprintln!("{marker} {}: {description}", notification.title),
            None => eprintln!("{marker} {}", notification.title),
        }
    }
}

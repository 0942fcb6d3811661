//! Reader diagnostics
//!
//! Non-fatal issues met while reading (unknown entity types, skipped
//! sections, encoding fallbacks, recovered section errors) are collected as
//! [`Notification`] items on the document instead of being dropped or turned
//! into hard errors. Every notification is also emitted as a `tracing` event.

use std::fmt;

/// Category of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// Record kind the reader does not interpret
    NotImplemented,
    /// Non-fatal warning, such as a decoding fallback
    Warning,
    /// Error that was recovered from in failsafe mode
    Error,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImplemented => write!(f, "NotImplemented"),
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// A single notification produced during reading
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// The category
    pub notification_type: NotificationType,
    /// A human-readable description of the issue
    pub message: String,
}

impl Notification {
    /// Create a new notification
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.notification_type, self.message)
    }
}

/// Notifications collected during one read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification
    pub fn notify(&mut self, notification_type: NotificationType, message: impl Into<String>) {
        let message = message.into();
        match notification_type {
            NotificationType::NotImplemented => tracing::trace!(%message, "not implemented"),
            NotificationType::Warning => tracing::warn!(%message, "recovered"),
            NotificationType::Error => tracing::warn!(%message, "recovered from error"),
        }
        self.items.push(Notification::new(notification_type, message));
    }

    /// Check if there are any notifications
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of notifications
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over all notifications
    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// Get all notifications of a specific type
    pub fn of_type(&self, nt: NotificationType) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.notification_type == nt).collect()
    }

    /// Check whether any notification of the given type exists
    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type == nt)
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

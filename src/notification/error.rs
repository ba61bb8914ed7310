//! Notification error types.

use thiserror::Error;

/// Errors that can occur while raising a desktop notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The notification server rejected or never received the notification.
    #[error("failed to send notification: {0}")]
    SendFailed(String),
}

impl NotificationError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::SendFailed(_) => {
                "check that a notification service is running, or press n to turn notifications off"
            }
        }
    }
}

//! Transient user-facing notices raised by the controller.

use std::time::Duration;

/// How long the presentation layer should keep a notice visible.
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A query round-trip failed; the user may resubmit.
    RequestFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
    pub duration: Duration,
}

impl Notification {
    #[must_use]
    pub fn request_failed() -> Self {
        Self {
            kind: NotificationKind::RequestFailed,
            title: "Error".to_string(),
            description: "Failed to get response from the server".to_string(),
            duration: NOTIFICATION_DURATION,
        }
    }
}

//! Notification integration trait definition.

use anyhow::Result;
use async_trait::async_trait;

use super::{Notification, NotificationType};

/// A destination for store notifications.
#[async_trait]
pub trait NotificationIntegration: Send + Sync {
    /// Integration name (for logging and config identification)
    fn name(&self) -> &str;

    /// Whether this integration wants notifications of this type
    fn handles(&self, notification_type: &NotificationType) -> bool;

    fn is_enabled(&self) -> bool;

    /// Deliver one notification.
    ///
    /// Errors are logged by the dispatcher and never reach the caller.
    async fn send(&self, notification: &Notification) -> Result<()>;
}

/// Empty subscription list means every type
pub(crate) fn subscribed(events: &[String], notification_type: &NotificationType) -> bool {
    events.is_empty() || events.iter().any(|e| e == notification_type.as_str())
}

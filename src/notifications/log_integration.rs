//! Notification integration that records notifications in the service log.

use anyhow::Result;
use async_trait::async_trait;

use super::integration::NotificationIntegration;
use super::{Notification, NotificationType};

/// Always-on sink; every notification leaves at least a log line
#[derive(Debug, Default)]
pub struct LogIntegration;

impl LogIntegration {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationIntegration for LogIntegration {
    fn name(&self) -> &str {
        "log"
    }

    fn handles(&self, _notification_type: &NotificationType) -> bool {
        true
    }

    fn is_enabled(&self) -> bool {
        true
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        tracing::info!(
            notification_id = %notification.notification_id,
            store_id = %notification.store_id,
            notification_type = %notification.notification_type,
            recipients = ?notification.recipients,
            "{}",
            notification.subject
        );
        Ok(())
    }
}

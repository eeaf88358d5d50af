//! Forwards notifications to the notification collaborator service.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::integration::NotificationIntegration;
use super::{Notification, NotificationType};
use crate::collaborators::ServiceClient;

#[derive(Debug, Serialize)]
struct SendNotificationsBody<'a> {
    store_id: &'a str,
    notification_type: &'a str,
    timestamp: DateTime<Utc>,
}

pub struct BackendIntegration {
    client: ServiceClient,
    enabled: bool,
}

impl BackendIntegration {
    pub fn new(client: ServiceClient, enabled: bool) -> Self {
        Self { client, enabled }
    }
}

#[async_trait]
impl NotificationIntegration for BackendIntegration {
    fn name(&self) -> &str {
        self.client.service()
    }

    fn handles(&self, _notification_type: &NotificationType) -> bool {
        true
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        let body = SendNotificationsBody {
            store_id: &notification.store_id,
            notification_type: notification.notification_type.as_str(),
            timestamp: notification.timestamp,
        };

        let _: serde_json::Value = self.client.post_json("send-notifications", &body).await?;
        tracing::debug!(
            notification_id = %notification.notification_id,
            store_id = %notification.store_id,
            "Notification accepted by backend"
        );
        Ok(())
    }
}

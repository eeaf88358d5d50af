//! Central dispatcher that fans notifications out to all integrations.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use super::backend_integration::BackendIntegration;
use super::integration::NotificationIntegration;
use super::log_integration::LogIntegration;
use super::webhook_integration::WebhookIntegration;
use super::{Notification, NotificationReceipt, NotificationType};
use crate::collaborators::ServiceClient;
use crate::config::Config;

/// Renders notifications and delivers them to every enabled integration
/// that subscribes to the notification type.
pub struct NotificationDispatcher {
    integrations: Vec<Arc<dyn NotificationIntegration>>,
    enabled: bool,
    timeout: Duration,
}

impl NotificationDispatcher {
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = &config.notifications;
        let timeout = config.timeouts.notification();

        let mut integrations: Vec<Arc<dyn NotificationIntegration>> =
            vec![Arc::new(LogIntegration::new())];

        if settings.backend_enabled {
            let client = ServiceClient::new("notification", &config.services.notification, timeout)?;
            integrations.push(Arc::new(BackendIntegration::new(client, true)));
        }

        let webhooks: Vec<_> = settings
            .webhooks
            .iter()
            .filter(|w| w.enabled && !w.url.is_empty())
            .collect();
        if !webhooks.is_empty() {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .context("Failed to build webhook HTTP client")?;
            for webhook in webhooks {
                integrations.push(Arc::new(WebhookIntegration::new(webhook, client.clone())));
            }
        }

        Ok(Self {
            integrations,
            enabled: settings.enabled,
            timeout,
        })
    }

    /// Dispatcher that renders receipts but delivers nothing
    pub fn disabled() -> Self {
        Self {
            integrations: Vec::new(),
            enabled: false,
            timeout: Duration::from_secs(1),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_integrations(integrations: Vec<Arc<dyn NotificationIntegration>>) -> Self {
        Self {
            integrations,
            enabled: true,
            timeout: Duration::from_secs(5),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn integration_count(&self) -> usize {
        self.integrations.len()
    }

    /// Render and dispatch a notification.
    ///
    /// Delivery runs on spawned tasks; failures are logged, never returned.
    /// The receipt always reads `sent`, even when delivery is switched off.
    /// Must be called from within a tokio runtime.
    pub fn notify(&self, store_id: &str, notification_type: NotificationType) -> NotificationReceipt {
        let notification = Arc::new(Notification::new(store_id, notification_type));

        if self.enabled {
            self.dispatch(&notification);
        } else {
            tracing::info!(
                store_id,
                notification_type = %notification.notification_type,
                "Notifications disabled, delivery suppressed"
            );
        }

        NotificationReceipt {
            notification_id: notification.notification_id.clone(),
            store_id: notification.store_id.clone(),
            notification_type: notification.notification_type.clone(),
            status: "sent".to_string(),
            recipients_count: notification.recipients.len(),
            sent_at: notification.timestamp,
            message: notification.message.clone(),
        }
    }

    fn dispatch(&self, notification: &Arc<Notification>) {
        for integration in &self.integrations {
            if !integration.is_enabled() || !integration.handles(&notification.notification_type) {
                continue;
            }

            let integration = integration.clone();
            let notification = notification.clone();
            let timeout = self.timeout;

            tokio::spawn(async move {
                let outcome = tokio::time::timeout(timeout, integration.send(&notification)).await;
                let error = match outcome {
                    Ok(Ok(())) => return,
                    Ok(Err(e)) => e.to_string(),
                    Err(_) => format!("timed out after {}s", timeout.as_secs()),
                };
                tracing::warn!(
                    integration = %integration.name(),
                    store_id = %notification.store_id,
                    notification_type = %notification.notification_type,
                    error = %error,
                    "Notification delivery failed"
                );
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WebhookConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn webhook(name: &str, enabled: bool, url: &str) -> WebhookConfig {
        WebhookConfig {
            name: Some(name.into()),
            enabled,
            url: url.into(),
            auth_type: None,
            token_env: None,
            username: None,
            password_env: None,
            events: None,
        }
    }

    #[test]
    fn test_dispatcher_from_default_config() {
        let dispatcher = NotificationDispatcher::from_config(&Config::default()).unwrap();

        assert!(dispatcher.is_enabled());
        assert_eq!(dispatcher.integration_count(), 2); // log + backend
    }

    #[test]
    fn test_dispatcher_without_backend() {
        let mut config = Config::default();
        config.notifications.backend_enabled = false;
        let dispatcher = NotificationDispatcher::from_config(&config).unwrap();
        assert_eq!(dispatcher.integration_count(), 1);
    }

    #[test]
    fn test_dispatcher_skips_disabled_and_empty_webhooks() {
        let mut config = Config::default();
        config.notifications.webhooks = vec![
            webhook("slack", true, "https://hooks.slack.com/test"),
            webhook("off", false, "https://example.com/2"),
            webhook("no-url", true, ""),
        ];

        let dispatcher = NotificationDispatcher::from_config(&config).unwrap();
        assert_eq!(dispatcher.integration_count(), 3); // log + backend + slack
    }

    #[tokio::test]
    async fn test_disabled_dispatcher_still_reports_sent() {
        let receipt = NotificationDispatcher::disabled().notify("store_1", NotificationType::Launch);
        assert_eq!(receipt.status, "sent");
        assert_eq!(receipt.recipients_count, 2);
    }

    struct CountingIntegration {
        events: Vec<String>,
        enabled: bool,
        fail: bool,
        sent: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl NotificationIntegration for CountingIntegration {
        fn name(&self) -> &str {
            "counting"
        }

        fn handles(&self, notification_type: &NotificationType) -> bool {
            super::super::integration::subscribed(&self.events, notification_type)
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        async fn send(&self, _notification: &Notification) -> Result<()> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("endpoint down");
            }
            Ok(())
        }
    }

    fn counting(
        events: &[&str],
        enabled: bool,
        fail: bool,
    ) -> (Arc<AtomicUsize>, Arc<dyn NotificationIntegration>) {
        let sent = Arc::new(AtomicUsize::new(0));
        let integration: Arc<dyn NotificationIntegration> = Arc::new(CountingIntegration {
            events: events.iter().map(|e| e.to_string()).collect(),
            enabled,
            fail,
            sent: sent.clone(),
        });
        (sent, integration)
    }

    #[tokio::test]
    async fn test_notify_dispatches_to_matching_integrations() {
        let (all, all_integration) = counting(&[], true, false);
        let (launch_only, launch_integration) = counting(&["launch"], true, false);
        let (disabled, disabled_integration) = counting(&[], false, false);

        let dispatcher = NotificationDispatcher::with_integrations(vec![
            all_integration,
            launch_integration,
            disabled_integration,
        ]);

        let receipt = dispatcher.notify("store_1", NotificationType::DeploymentStarted);
        assert_eq!(receipt.status, "sent");
        assert_eq!(receipt.message, "Deployment for store store_1 has begun.");

        // Give spawned tasks time to complete
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(all.load(Ordering::SeqCst), 1);
        assert_eq!(launch_only.load(Ordering::SeqCst), 0);
        assert_eq!(disabled.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_delivery_still_reports_sent() {
        let (attempts, failing) = counting(&[], true, true);
        let dispatcher = NotificationDispatcher::with_integrations(vec![failing]);

        let receipt = dispatcher.notify("store_2", NotificationType::Launch);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(receipt.status, "sent");
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}

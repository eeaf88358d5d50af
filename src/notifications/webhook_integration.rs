//! Webhook notification integration.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::integration::{subscribed, NotificationIntegration};
use super::{Notification, NotificationType};
use crate::config::WebhookConfig;

/// Webhook authentication type.
#[derive(Debug, Clone)]
pub enum WebhookAuth {
    None,
    Bearer { token: String },
    Basic { username: String, password: String },
}

/// POSTs each notification to a user-configured endpoint.
pub struct WebhookIntegration {
    name: String,
    url: String,
    auth: WebhookAuth,
    subscribed_events: Vec<String>,
    enabled: bool,
    client: Client,
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    /// Notification type, e.g. "launch"
    event: &'a str,
    /// RFC 3339 timestamp
    timestamp: String,
    data: &'a Notification,
}

impl WebhookIntegration {
    pub fn new(config: &WebhookConfig, client: Client) -> Self {
        let name = config.name.clone().unwrap_or_else(|| "webhook".to_string());
        let auth = match config.auth_type.as_deref() {
            Some("bearer") => WebhookAuth::Bearer {
                token: secret_from_env(&name, config.token_env.as_deref()),
            },
            Some("basic") => WebhookAuth::Basic {
                username: config.username.clone().unwrap_or_default(),
                password: secret_from_env(&name, config.password_env.as_deref()),
            },
            _ => WebhookAuth::None,
        };

        Self {
            name,
            url: config.url.clone(),
            auth,
            subscribed_events: config.events.clone().unwrap_or_default(),
            enabled: config.enabled,
            client,
        }
    }
}

fn secret_from_env(webhook: &str, env_var: Option<&str>) -> String {
    let Some(env_var) = env_var.filter(|v| !v.is_empty()) else {
        return String::new();
    };
    let secret = std::env::var(env_var).unwrap_or_default();
    if secret.is_empty() {
        tracing::warn!(
            webhook,
            env_var,
            "Webhook credential environment variable is not set or empty"
        );
    }
    secret
}

#[async_trait]
impl NotificationIntegration for WebhookIntegration {
    fn name(&self) -> &str {
        &self.name
    }

    fn handles(&self, notification_type: &NotificationType) -> bool {
        subscribed(&self.subscribed_events, notification_type)
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        let payload = WebhookPayload {
            event: notification.notification_type.as_str(),
            timestamp: notification.timestamp.to_rfc3339(),
            data: notification,
        };

        let mut request = self.client.post(&self.url).json(&payload);
        request = match &self.auth {
            WebhookAuth::Bearer { token } => request.bearer_auth(token),
            WebhookAuth::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            WebhookAuth::None => request,
        };

        let response = request.send().await?;
        if !response.status().is_success() {
            anyhow::bail!("webhook returned {}", response.status());
        }

        tracing::debug!(
            webhook = %self.name,
            event = %notification.notification_type,
            status = %response.status(),
            "Webhook delivered successfully"
        );
        Ok(())
    }
}

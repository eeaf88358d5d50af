//! Notification system for store launch events.
//!
//! A [`NotificationDispatcher`] renders a [`Notification`] from the
//! template for its type and hands it to every integration (log line,
//! notification backend, user webhooks) that subscribes to that type.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod backend_integration;
mod integration;
mod log_integration;
mod service;
mod webhook_integration;

pub use backend_integration::BackendIntegration;
pub use integration::NotificationIntegration;
pub use log_integration::LogIntegration;
pub use service::NotificationDispatcher;
pub use webhook_integration::WebhookIntegration;

/// Kind of store notification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationType {
    /// Store is live
    Launch,
    SetupComplete,
    DeploymentStarted,
    /// Any other type a client asks for; rendered with the fallback template
    Other(String),
}

impl NotificationType {
    pub fn parse(value: &str) -> Self {
        match value {
            "launch" => NotificationType::Launch,
            "setup_complete" => NotificationType::SetupComplete,
            "deployment_started" => NotificationType::DeploymentStarted,
            other => NotificationType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NotificationType::Launch => "launch",
            NotificationType::SetupComplete => "setup_complete",
            NotificationType::DeploymentStarted => "deployment_started",
            NotificationType::Other(other) => other,
        }
    }

    /// Subject, message and recipients for a store
    pub fn render(&self, store_id: &str) -> (&'static str, String, &'static [&'static str]) {
        match self {
            NotificationType::Launch => (
                "Your store is now live!",
                format!(
                    "Congratulations! Your store {} has been successfully launched.",
                    store_id
                ),
                &["customer", "stakeholders"],
            ),
            NotificationType::SetupComplete => (
                "Store setup completed",
                format!("Your store {} setup has been completed successfully.", store_id),
                &["customer"],
            ),
            NotificationType::DeploymentStarted => (
                "Store deployment started",
                format!("Deployment for store {} has begun.", store_id),
                &["customer"],
            ),
            NotificationType::Other(_) => (
                "Store notification",
                format!("Notification for store {}", store_id),
                &["customer"],
            ),
        }
    }
}

impl From<String> for NotificationType {
    fn from(value: String) -> Self {
        NotificationType::parse(&value)
    }
}

impl From<NotificationType> for String {
    fn from(value: NotificationType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered notification, as delivered to integrations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub notification_id: String,
    pub store_id: String,
    pub notification_type: NotificationType,
    pub subject: String,
    pub message: String,
    pub recipients: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(store_id: &str, notification_type: NotificationType) -> Self {
        let (subject, message, recipients) = notification_type.render(store_id);
        Self {
            notification_id: crate::launch::mint_id("notif"),
            store_id: store_id.to_string(),
            subject: subject.to_string(),
            message,
            recipients: recipients.iter().map(|r| r.to_string()).collect(),
            notification_type,
            timestamp: Utc::now(),
        }
    }
}

/// Acknowledgement returned to whoever asked for a notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationReceipt {
    pub notification_id: String,
    pub store_id: String,
    pub notification_type: NotificationType,
    /// Always `sent`; suppressed deliveries are only logged
    pub status: String,
    pub recipients_count: usize,
    pub sent_at: DateTime<Utc>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_strings_round_trip() {
        for name in ["launch", "setup_complete", "deployment_started", "promo"] {
            assert_eq!(NotificationType::parse(name).as_str(), name);
        }
        assert_eq!(
            NotificationType::parse("promo"),
            NotificationType::Other("promo".to_string())
        );
    }

    #[test]
    fn test_launch_template() {
        let notification = Notification::new("store_1234abcd", NotificationType::Launch);
        assert_eq!(notification.subject, "Your store is now live!");
        assert_eq!(
            notification.message,
            "Congratulations! Your store store_1234abcd has been successfully launched."
        );
        assert_eq!(notification.recipients, vec!["customer", "stakeholders"]);
        assert!(notification.notification_id.starts_with("notif_"));
    }

    #[test]
    fn test_fallback_template_has_one_recipient() {
        let notification = Notification::new("s1", NotificationType::parse("weekly_digest"));
        assert_eq!(notification.subject, "Store notification");
        assert_eq!(notification.message, "Notification for store s1");
        assert_eq!(notification.recipients.len(), 1);
    }

    #[test]
    fn test_type_serializes_as_string() {
        let json = serde_json::to_string(&NotificationType::DeploymentStarted).unwrap();
        assert_eq!(json, "\"deployment_started\"");
        let parsed: NotificationType = serde_json::from_str("\"launch\"").unwrap();
        assert_eq!(parsed, NotificationType::Launch);
    }
}

//! Deployment record and its monotonic state transitions.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::progress::{DeploymentStatus, ProgressPoint, PROGRESS_CEILING};

/// Deterministic public URL of a store
pub fn store_url(store_id: &str, store_domain: &str) -> String {
    format!("https://{}.{}", store_id, store_domain)
}

#[derive(Debug, Clone)]
pub struct Deployment {
    pub deployment_id: String,
    pub store_id: String,
    pub status: DeploymentStatus,
    pub progress: u8,
    /// Set once the deployment completes
    pub store_url: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub store_config: Map<String, Value>,
    pub launch_settings: Map<String, Value>,
    /// Monotonic creation instant that elapsed time is measured from
    pub started: Instant,
}

impl Deployment {
    pub fn new(
        deployment_id: String,
        store_id: String,
        store_config: Map<String, Value>,
        launch_settings: Map<String, Value>,
        started: Instant,
    ) -> Self {
        let now = Utc::now();
        Self {
            deployment_id,
            store_id,
            status: DeploymentStatus::Deploying,
            progress: 0,
            store_url: None,
            message: status_message(DeploymentStatus::Deploying),
            created_at: now,
            last_updated: now,
            store_config,
            launch_settings,
            started,
        }
    }

    /// Fold a reading into the record without ever moving backwards.
    ///
    /// Stage and progress each only increase; readings for a terminal
    /// deployment are ignored. Returns the new status when it changed.
    pub fn observe(&mut self, point: ProgressPoint, store_domain: &str) -> Option<DeploymentStatus> {
        if self.status.is_terminal() {
            return None;
        }

        match point.status {
            DeploymentStatus::Completed => {
                self.progress = 100;
                self.store_url = Some(store_url(&self.store_id, store_domain));
                self.transition(DeploymentStatus::Completed)
            }
            DeploymentStatus::Failed => self.fail("Store deployment failed"),
            status => {
                self.progress = self.progress.max(point.progress.min(PROGRESS_CEILING));
                self.transition(self.status.max(status))
            }
        }
    }

    /// Move to the terminal failed state, keeping the progress reached
    pub fn fail(&mut self, reason: &str) -> Option<DeploymentStatus> {
        if self.status.is_terminal() {
            return None;
        }
        let changed = self.transition(DeploymentStatus::Failed);
        self.message = reason.to_string();
        changed
    }

    fn transition(&mut self, status: DeploymentStatus) -> Option<DeploymentStatus> {
        if status == self.status {
            return None;
        }
        self.status = status;
        self.message = status_message(status);
        self.last_updated = Utc::now();
        Some(status)
    }

    /// Whether the launch settings allow the completion notification.
    /// Absent means the configured default applies.
    pub fn wants_launch_notification(&self) -> Option<bool> {
        self.launch_settings
            .get("sendNotifications")
            .and_then(Value::as_bool)
    }
}

fn status_message(status: DeploymentStatus) -> String {
    match status {
        DeploymentStatus::Completed => "Store deployment completed successfully".to_string(),
        DeploymentStatus::Failed => "Store deployment failed".to_string(),
        other => format!("Store deployment {}", other),
    }
}

//! API state management for the REST server.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::collaborators::Collaborators;
use crate::config::Config;
use crate::launch::{
    Clock, DeploymentOrchestrator, LaunchService, OrchestratorSettings, SystemClock,
};
use crate::notifications::NotificationDispatcher;
use crate::wizard::{SessionStore, StepController};

/// Shared state for the REST API
#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
    pub steps: Arc<StepController>,
    pub launch: Arc<LaunchService>,
    pub notifier: Arc<NotificationDispatcher>,
    pub collaborators: Collaborators,
}

impl ApiState {
    /// Wire every component from config, with HTTP collaborators
    pub fn new(config: Config) -> Result<Self> {
        let collaborators =
            Collaborators::from_config(&config).context("Failed to build collaborator clients")?;
        let notifier = NotificationDispatcher::from_config(&config)
            .context("Failed to build notification dispatcher")?;
        Ok(Self::from_parts(
            config,
            collaborators,
            Arc::new(notifier),
            Arc::new(SystemClock),
        ))
    }

    /// Wire the state around supplied collaborators, notifier and clock
    pub fn from_parts(
        config: Config,
        collaborators: Collaborators,
        notifier: Arc<NotificationDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let sessions = Arc::new(SessionStore::in_memory());
        let orchestrator = Arc::new(DeploymentOrchestrator::new(
            collaborators.deployment.clone(),
            notifier.clone(),
            clock,
            OrchestratorSettings::from_config(&config),
        ));

        Self {
            steps: Arc::new(StepController::new(sessions.clone())),
            launch: Arc::new(LaunchService::new(sessions.clone(), orchestrator)),
            config: Arc::new(config),
            sessions,
            notifier,
            collaborators,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_state_starts_empty() {
        let state = ApiState::new(Config::default()).unwrap();
        assert_eq!(state.sessions.count().await.unwrap(), 0);
        assert_eq!(state.launch.orchestrator().count().await.unwrap(), 0);
        assert!(state.notifier.is_enabled());
    }
}

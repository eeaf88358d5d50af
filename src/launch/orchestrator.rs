//! Deployment orchestration: creation, status polling and completion
//! notifications.
//!
//! Status and progress are computed lazily at poll time from elapsed time
//! alone; the deployment backend can only fail a deployment. Nothing runs
//! in the background.

use std::sync::Arc;
use std::time::Duration;

use crate::collaborators::{bounded, DeployOrder, DeploymentBackend};
use crate::config::Config;
use crate::notifications::{NotificationDispatcher, NotificationType};
use crate::store::{KeyedLocks, MemoryStore, Store};

use super::clock::Clock;
use super::deployment::{store_url, Deployment};
use super::progress::{progress_at, DeploymentStatus, NOMINAL_DEPLOY_DURATION};
use super::validator::{LaunchRequest, ValidatedLaunch};
use super::{mint_id, LaunchError};

/// Orchestrator knobs, normally taken from [`Config`]
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub nominal_duration: Duration,
    pub store_domain: String,
    pub deploy_timeout: Duration,
    pub status_timeout: Duration,
    pub notify_on_start: bool,
    /// Default for deployments whose launch settings don't say
    pub notify_on_launch: bool,
}

impl OrchestratorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            nominal_duration: config.deployment.nominal_duration(),
            store_domain: config.deployment.store_domain.clone(),
            deploy_timeout: config.timeouts.deploy(),
            status_timeout: config.timeouts.status(),
            notify_on_start: config.notifications.on_deployment_started,
            notify_on_launch: config.notifications.on_launch,
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            nominal_duration: NOMINAL_DEPLOY_DURATION,
            store_domain: "nextbasket.com".to_string(),
            deploy_timeout: Duration::from_secs(60),
            status_timeout: Duration::from_secs(10),
            notify_on_start: false,
            notify_on_launch: true,
        }
    }
}

/// What a caller gets back when a deployment starts
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentHandle {
    pub deployment_id: String,
    pub store_id: String,
    /// Where the store will live once the deployment completes
    pub store_url: String,
    pub status: DeploymentStatus,
    /// Nominal duration in seconds
    pub estimated_time: u64,
    pub message: String,
}

pub struct DeploymentOrchestrator {
    deployments: Arc<dyn Store<Deployment>>,
    locks: KeyedLocks,
    backend: Arc<dyn DeploymentBackend>,
    notifier: Arc<NotificationDispatcher>,
    clock: Arc<dyn Clock>,
    settings: OrchestratorSettings,
}

impl DeploymentOrchestrator {
    pub fn new(
        backend: Arc<dyn DeploymentBackend>,
        notifier: Arc<NotificationDispatcher>,
        clock: Arc<dyn Clock>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            deployments: Arc::new(MemoryStore::new()),
            locks: KeyedLocks::new(),
            backend,
            notifier,
            clock,
            settings,
        }
    }

    /// Record a deployment for a validated launch and ask the backend to
    /// start it.
    ///
    /// The record exists before the backend is called; a backend that is
    /// down or slow leaves the deployment `deploying` rather than failing.
    /// Only an explicit `failed` answer changes the new deployment.
    pub async fn start(
        &self,
        launch: ValidatedLaunch,
        request: &LaunchRequest,
    ) -> Result<DeploymentHandle, LaunchError> {
        let deployment_id = mint_id("deploy");
        let store_id = launch.store_id().to_string();
        let mut deployment = Deployment::new(
            deployment_id.clone(),
            store_id.clone(),
            request.store_config.clone(),
            request.launch_settings.clone(),
            self.clock.now(),
        );

        let _guard = self.locks.acquire(&deployment_id).await;
        self.deployments
            .put(&deployment_id, deployment.clone())
            .await?;
        tracing::info!(
            deployment_id = %deployment_id,
            store_id = %store_id,
            session_id = %request.session_id,
            warnings = launch.warnings().len(),
            "Deployment created"
        );

        let order = DeployOrder {
            store_id: store_id.clone(),
            store_config: request.store_config.clone(),
            launch_settings: request.launch_settings.clone(),
            deployment_id: deployment_id.clone(),
        };
        match bounded(
            "deployment",
            self.settings.deploy_timeout,
            self.backend.start_deployment(&order),
        )
        .await
        {
            Ok(remote) if remote.is_failure() => {
                tracing::warn!(
                    deployment_id = %deployment_id,
                    "Deployment backend rejected the deployment"
                );
                deployment.fail("Deployment backend rejected the deployment");
                self.deployments
                    .put(&deployment_id, deployment.clone())
                    .await?;
            }
            Ok(remote) => {
                tracing::debug!(
                    deployment_id = %deployment_id,
                    remote_status = %remote.status,
                    "Deployment backend accepted the deployment"
                );
            }
            Err(e) => {
                tracing::warn!(
                    deployment_id = %deployment_id,
                    error = %e,
                    "Deployment backend did not accept the deployment, tracking locally"
                );
            }
        }

        if self.settings.notify_on_start && !deployment.status.is_terminal() {
            self.notifier
                .notify(&store_id, NotificationType::DeploymentStarted);
        }

        Ok(DeploymentHandle {
            store_url: store_url(&store_id, &self.settings.store_domain),
            status: deployment.status,
            estimated_time: self.settings.nominal_duration.as_secs(),
            message: "Store deployment initiated".to_string(),
            deployment_id,
            store_id,
        })
    }

    /// Current snapshot of a deployment.
    ///
    /// Polls at the same elapsed time agree and never go backwards. Once
    /// terminal, the stored snapshot is returned without asking the
    /// backend again.
    pub async fn status(&self, deployment_id: &str) -> Result<Deployment, LaunchError> {
        let not_found = || LaunchError::DeploymentNotFound(deployment_id.to_string());

        let snapshot = self.deployments.get(deployment_id).await?.ok_or_else(not_found)?;
        if snapshot.status.is_terminal() {
            return Ok(snapshot);
        }

        let _guard = self.locks.acquire(deployment_id).await;
        let mut deployment = self.deployments.get(deployment_id).await?.ok_or_else(not_found)?;
        if deployment.status.is_terminal() {
            return Ok(deployment);
        }

        let domain = self.settings.store_domain.as_str();
        let elapsed = self
            .clock
            .now()
            .saturating_duration_since(deployment.started);
        deployment.observe(progress_at(elapsed, self.settings.nominal_duration), domain);

        if !deployment.status.is_terminal() {
            match bounded(
                "deployment",
                self.settings.status_timeout,
                self.backend.deployment_status(deployment_id),
            )
            .await
            {
                Ok(remote) if remote.is_failure() => {
                    deployment.fail("Store deployment failed");
                }
                Ok(_) => {}
                Err(e) => tracing::debug!(
                    deployment_id,
                    error = %e,
                    "Deployment status lookup failed, using elapsed time only"
                ),
            }
        }

        self.deployments
            .put(deployment_id, deployment.clone())
            .await?;

        match deployment.status {
            DeploymentStatus::Completed => {
                tracing::info!(
                    deployment_id,
                    store_id = %deployment.store_id,
                    "Deployment completed"
                );
                let wanted = deployment
                    .wants_launch_notification()
                    .unwrap_or(self.settings.notify_on_launch);
                if wanted {
                    self.notifier
                        .notify(&deployment.store_id, NotificationType::Launch);
                }
            }
            DeploymentStatus::Failed => {
                tracing::warn!(
                    deployment_id,
                    store_id = %deployment.store_id,
                    "Deployment failed"
                );
            }
            _ => {}
        }

        Ok(deployment)
    }

    pub async fn count(&self) -> Result<usize, LaunchError> {
        Ok(self.deployments.len().await?)
    }
}

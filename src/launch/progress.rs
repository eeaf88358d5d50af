//! Elapsed-time progress model for deployments.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Nominal time for a deployment to run to completion
pub const NOMINAL_DEPLOY_DURATION: Duration = Duration::from_secs(120);

/// Highest progress a non-terminal deployment may report
pub const PROGRESS_CEILING: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    Deploying,
    Configuring,
    Testing,
    Finalizing,
    Completed,
    Failed,
}

impl DeploymentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, DeploymentStatus::Completed | DeploymentStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentStatus::Deploying => "deploying",
            DeploymentStatus::Configuring => "configuring",
            DeploymentStatus::Testing => "testing",
            DeploymentStatus::Finalizing => "finalizing",
            DeploymentStatus::Completed => "completed",
            DeploymentStatus::Failed => "failed",
        }
    }

    /// Parse a status string reported by the deployment backend
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "deploying" => Some(DeploymentStatus::Deploying),
            "configuring" => Some(DeploymentStatus::Configuring),
            "testing" => Some(DeploymentStatus::Testing),
            "finalizing" => Some(DeploymentStatus::Finalizing),
            "completed" => Some(DeploymentStatus::Completed),
            "failed" => Some(DeploymentStatus::Failed),
            _ => None,
        }
    }

    /// Non-terminal stage for a progress percentage
    pub fn for_progress(progress: u8) -> Self {
        match progress {
            0..=24 => DeploymentStatus::Deploying,
            25..=49 => DeploymentStatus::Configuring,
            50..=74 => DeploymentStatus::Testing,
            _ => DeploymentStatus::Finalizing,
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (status, progress) reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressPoint {
    pub status: DeploymentStatus,
    pub progress: u8,
}

impl ProgressPoint {
    pub fn completed() -> Self {
        Self {
            status: DeploymentStatus::Completed,
            progress: 100,
        }
    }

    /// Non-terminal reading with progress clamped to the ceiling
    pub fn in_flight(status: DeploymentStatus, progress: u32) -> Self {
        let progress = progress.min(u32::from(PROGRESS_CEILING)) as u8;
        Self { status, progress }
    }
}

/// Where a deployment stands after `elapsed` of a `total` nominal run.
///
/// Progress is `floor(elapsed / total * 100)` capped at the ceiling; once
/// elapsed passes the ceiling's share of the total the deployment is
/// complete at exactly 100.
pub fn progress_at(elapsed: Duration, total: Duration) -> ProgressPoint {
    let elapsed_ms = elapsed.as_millis();
    let total_ms = total.as_millis().max(1);

    if elapsed_ms * 100 > total_ms * u128::from(PROGRESS_CEILING) {
        return ProgressPoint::completed();
    }

    let raw = (elapsed_ms * 100 / total_ms) as u32;
    let point = ProgressPoint::in_flight(DeploymentStatus::Deploying, raw);
    ProgressPoint {
        status: DeploymentStatus::for_progress(point.progress),
        progress: point.progress,
    }
}

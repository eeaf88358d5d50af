//! Store launch: validation, deployment tracking and status polling.

use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

mod clock;
mod deployment;
mod orchestrator;
mod progress;
mod service;
mod validator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use deployment::{store_url, Deployment};
pub use orchestrator::{DeploymentHandle, DeploymentOrchestrator, OrchestratorSettings};
pub use progress::{
    progress_at, DeploymentStatus, ProgressPoint, NOMINAL_DEPLOY_DURATION, PROGRESS_CEILING,
};
pub use service::LaunchService;
pub use validator::{
    is_truthy, LaunchRequest, LaunchValidator, ValidatedLaunch, ValidationResult,
    MIN_LAUNCH_PRODUCTS, REQUIRED_FIELDS,
};

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Store configuration failed validation")]
    ValidationFailed(ValidationResult),
    #[error("Session '{0}' not found")]
    SessionNotFound(String),
    #[error("Deployment '{0}' not found")]
    DeploymentNotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Short prefixed identifier, e.g. `store_1a2b3c4d`
pub(crate) fn mint_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &hex[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_id_shape() {
        let id = mint_id("deploy");
        let (prefix, hex) = id.split_once('_').unwrap();
        assert_eq!(prefix, "deploy");
        assert_eq!(hex.len(), 8);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(mint_id("deploy"), id);
    }
}

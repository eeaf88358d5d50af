//! Session storage with per-session serialized updates.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::{WizardError, WizardSession, WizardStep};
use crate::store::{KeyedLocks, MemoryStore, Store, StoreResult};

/// Holds wizard sessions keyed by session id
pub struct SessionStore {
    sessions: Arc<dyn Store<WizardSession>>,
    locks: KeyedLocks,
}

impl SessionStore {
    pub fn new(sessions: Arc<dyn Store<WizardSession>>) -> Self {
        Self {
            sessions,
            locks: KeyedLocks::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Create and store a fresh session
    pub async fn create(
        &self,
        user_preferences: Map<String, Value>,
    ) -> Result<WizardSession, WizardError> {
        let session = WizardSession::new(user_preferences);
        self.sessions
            .put(&session.session_id, session.clone())
            .await?;
        tracing::info!(session_id = %session.session_id, "Wizard session created");
        Ok(session)
    }

    pub async fn get(&self, session_id: &str) -> Result<WizardSession, WizardError> {
        self.sessions
            .get(session_id)
            .await?
            .ok_or_else(|| WizardError::SessionNotFound(session_id.to_string()))
    }

    pub async fn exists(&self, session_id: &str) -> StoreResult<bool> {
        Ok(self.sessions.get(session_id).await?.is_some())
    }

    /// Merge step data into a session.
    ///
    /// The step number is checked before the session is touched, so an
    /// invalid step never modifies state.
    pub async fn update_step(
        &self,
        session_id: &str,
        step_number: i64,
        step_data: Map<String, Value>,
        auto_advance: bool,
    ) -> Result<WizardSession, WizardError> {
        let step =
            WizardStep::from_number(step_number).ok_or(WizardError::InvalidStep(step_number))?;

        let _guard = self.locks.acquire(session_id).await;
        let mut session = self.get(session_id).await?;
        session.apply_step(step, step_data, auto_advance);
        self.sessions.put(session_id, session.clone()).await?;

        tracing::debug!(
            session_id = %session_id,
            step = step.number(),
            current_step = session.current_step,
            "Wizard step updated"
        );
        Ok(session)
    }

    pub async fn count(&self) -> Result<usize, WizardError> {
        Ok(self.sessions.len().await?)
    }
}

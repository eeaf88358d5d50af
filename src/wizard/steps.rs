//! Step controller: session creation, lookup and advancement with
//! advisory next actions.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::{SessionStore, WizardError, WizardSession, WizardStep};
use crate::launch::{is_truthy, MIN_LAUNCH_PRODUCTS};

/// Result of advancing a step
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub session: WizardSession,
    pub next_step: u8,
    pub recommendations: Vec<String>,
}

pub struct StepController {
    sessions: Arc<SessionStore>,
}

impl StepController {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn create_session(
        &self,
        user_preferences: Map<String, Value>,
    ) -> Result<WizardSession, WizardError> {
        self.sessions.create(user_preferences).await
    }

    pub async fn session(&self, session_id: &str) -> Result<WizardSession, WizardError> {
        self.sessions.get(session_id).await
    }

    pub async fn advance(
        &self,
        session_id: &str,
        step_number: i64,
        step_data: Map<String, Value>,
        auto_advance: bool,
    ) -> Result<StepOutcome, WizardError> {
        let session = self
            .sessions
            .update_step(session_id, step_number, step_data, auto_advance)
            .await?;

        // update_step already rejected out-of-range numbers
        let step = WizardStep::from_number(step_number).ok_or(WizardError::InvalidStep(step_number))?;
        let recommendations = recommendations(&session, step);

        Ok(StepOutcome {
            next_step: step.next().number(),
            recommendations,
            session,
        })
    }
}

/// Advisory hints after `completed` was submitted.
///
/// Leads with the next step (if any), then lists launch prerequisites the
/// configuration is still missing.
pub fn recommendations(session: &WizardSession, completed: WizardStep) -> Vec<String> {
    let mut hints = Vec::new();

    if completed != WizardStep::Launch {
        let next = completed.next();
        hints.push(format!("Next: {} - {}", next.title(), next.description()));
    }

    if !is_truthy(session.step_value(WizardStep::BusinessSetup, "businessName")) {
        hints.push("Complete business information".to_string());
    }

    let product_count = session
        .step_value(WizardStep::Products, "products")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    if product_count < MIN_LAUNCH_PRODUCTS {
        hints.push(format!(
            "Add product details ({} of {} products required for launch)",
            product_count, MIN_LAUNCH_PRODUCTS
        ));
    }

    if !is_truthy(session.step_value(WizardStep::Design, "selectedTheme")) {
        hints.push("Select a store theme".to_string());
    }

    if !is_truthy(session.step_value(WizardStep::Integrations, "payment")) {
        hints.push("Connect a payment provider".to_string());
    }
    if !is_truthy(session.step_value(WizardStep::Integrations, "shipping")) {
        hints.push("Connect a shipping provider".to_string());
    }

    if !session.is_completed(WizardStep::Content) {
        hints.push("Generate marketing content and SEO copy".to_string());
    }

    let prerequisites_met = WizardStep::ALL
        .iter()
        .filter(|s| **s != WizardStep::Launch)
        .all(|s| session.is_completed(*s));
    if prerequisites_met && hints.iter().all(|h| h.starts_with("Next:")) {
        hints.push("Review your configuration and launch your store".to_string());
    }

    hints
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn controller() -> StepController {
        StepController::new(Arc::new(SessionStore::in_memory()))
    }

    fn data(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_advance_returns_next_step_and_hints() {
        let controller = controller();
        let session = controller.create_session(Map::new()).await.unwrap();

        let outcome = controller
            .advance(
                &session.session_id,
                1,
                data(json!({"businessName": "Acme"})),
                true,
            )
            .await
            .unwrap();

        assert_eq!(outcome.next_step, 2);
        assert_eq!(outcome.session.current_step, 2);
        assert_eq!(
            outcome.recommendations[0],
            "Next: Products - Set up your product catalog"
        );
        assert!(!outcome
            .recommendations
            .contains(&"Complete business information".to_string()));
        assert!(outcome
            .recommendations
            .iter()
            .any(|h| h.starts_with("Add product details (0 of 3")));
    }

    #[tokio::test]
    async fn test_advance_invalid_step() {
        let controller = controller();
        let session = controller.create_session(Map::new()).await.unwrap();
        let result = controller
            .advance(&session.session_id, 9, Map::new(), true)
            .await;
        assert!(matches!(result, Err(WizardError::InvalidStep(9))));
    }

    #[tokio::test]
    async fn test_last_step_next_is_bounded() {
        let controller = controller();
        let session = controller.create_session(Map::new()).await.unwrap();
        let outcome = controller
            .advance(&session.session_id, 6, Map::new(), true)
            .await
            .unwrap();
        assert_eq!(outcome.next_step, 6);
        assert!(!outcome.recommendations.iter().any(|h| h.starts_with("Next:")));
    }

    #[test]
    fn test_ready_session_recommends_launch() {
        let mut session = WizardSession::new(Map::new());
        session.apply_step(
            WizardStep::BusinessSetup,
            data(json!({"businessName": "Acme"})),
            true,
        );
        session.apply_step(
            WizardStep::Products,
            data(json!({"products": [{"id": 1}, {"id": 2}, {"id": 3}]})),
            true,
        );
        session.apply_step(
            WizardStep::Design,
            data(json!({"selectedTheme": "theme_001"})),
            true,
        );
        session.apply_step(
            WizardStep::Integrations,
            data(json!({"payment": ["stripe"], "shipping": ["ups"]})),
            true,
        );
        session.apply_step(WizardStep::Content, Map::new(), true);

        let hints = recommendations(&session, WizardStep::Content);
        assert_eq!(
            hints,
            vec![
                "Next: Launch - Review & launch your store".to_string(),
                "Review your configuration and launch your store".to_string(),
            ]
        );
    }
}

//! Wizard session lifecycle.
//!
//! A session walks a client through six fixed steps. Each step update merges
//! the submitted data into the session configuration under the step's slug.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::store::StoreError;

mod session;
mod steps;

pub use session::SessionStore;
pub use steps::{recommendations, StepController, StepOutcome};

/// Number of steps in the wizard
pub const TOTAL_STEPS: u8 = 6;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Session '{0}' not found")]
    SessionNotFound(String),
    #[error("Invalid step number {0}, expected 1-{TOTAL_STEPS}")]
    InvalidStep(i64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The fixed wizard steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    BusinessSetup,
    Products,
    Design,
    Integrations,
    Content,
    Launch,
}

impl WizardStep {
    pub const ALL: [WizardStep; TOTAL_STEPS as usize] = [
        WizardStep::BusinessSetup,
        WizardStep::Products,
        WizardStep::Design,
        WizardStep::Integrations,
        WizardStep::Content,
        WizardStep::Launch,
    ];

    /// Resolve a 1-based step number
    pub fn from_number(number: i64) -> Option<Self> {
        usize::try_from(number)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    /// 1-based step number
    pub fn number(self) -> u8 {
        match self {
            WizardStep::BusinessSetup => 1,
            WizardStep::Products => 2,
            WizardStep::Design => 3,
            WizardStep::Integrations => 4,
            WizardStep::Content => 5,
            WizardStep::Launch => 6,
        }
    }

    /// Configuration namespace for this step's data
    pub fn slug(self) -> &'static str {
        match self {
            WizardStep::BusinessSetup => "business_setup",
            WizardStep::Products => "products",
            WizardStep::Design => "design",
            WizardStep::Integrations => "integrations",
            WizardStep::Content => "content",
            WizardStep::Launch => "launch",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::BusinessSetup => "Business Setup",
            WizardStep::Products => "Products",
            WizardStep::Design => "Design",
            WizardStep::Integrations => "Integrations",
            WizardStep::Content => "Content",
            WizardStep::Launch => "Launch",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            WizardStep::BusinessSetup => "Configure your business details",
            WizardStep::Products => "Set up your product catalog",
            WizardStep::Design => "Choose your store theme",
            WizardStep::Integrations => "Connect payment & shipping",
            WizardStep::Content => "Generate marketing content",
            WizardStep::Launch => "Review & launch your store",
        }
    }

    /// The step after this one, saturating at the last step
    pub fn next(self) -> Self {
        Self::from_number(i64::from(self.number()) + 1).unwrap_or(WizardStep::Launch)
    }
}

/// State of one client's wizard run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardSession {
    pub session_id: String,
    pub current_step: u8,
    /// Step data keyed by step slug
    pub configuration: Map<String, Value>,
    pub completed_steps: BTreeSet<u8>,
    #[serde(default)]
    pub user_preferences: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WizardSession {
    pub fn new(user_preferences: Map<String, Value>) -> Self {
        let now = Utc::now();
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            current_step: 1,
            configuration: Map::new(),
            completed_steps: BTreeSet::new(),
            user_preferences,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge step data and record the step as completed.
    ///
    /// Keys already present under the step's namespace are overwritten;
    /// other keys are kept.
    pub fn apply_step(&mut self, step: WizardStep, data: Map<String, Value>, auto_advance: bool) {
        let namespace = self
            .configuration
            .entry(step.slug())
            .or_insert_with(|| Value::Object(Map::new()));
        if !namespace.is_object() {
            *namespace = Value::Object(Map::new());
        }
        if let Value::Object(existing) = namespace {
            existing.extend(data);
        }

        self.completed_steps.insert(step.number());
        if auto_advance {
            self.current_step = step.next().number();
        }
        self.updated_at = Utc::now();
    }

    /// Value stored under `key` by `step`, if any
    pub fn step_value(&self, step: WizardStep, key: &str) -> Option<&Value> {
        self.configuration
            .get(step.slug())
            .and_then(|ns| ns.get(key))
    }

    pub fn is_completed(&self, step: WizardStep) -> bool {
        self.completed_steps.contains(&step.number())
    }
}

//! Launch prerequisite checks.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::mint_id;

/// Fields that must be present and truthy in a store configuration
pub const REQUIRED_FIELDS: [&str; 3] = ["businessName", "products", "selectedTheme"];

/// Minimum catalog size for a launch
pub const MIN_LAUNCH_PRODUCTS: usize = 3;

/// A request to validate or deploy a store
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LaunchRequest {
    /// Session the configuration was built in; checked again at deploy time
    pub session_id: String,
    #[serde(default)]
    pub store_config: Map<String, Value>,
    #[serde(default)]
    pub launch_settings: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
}

impl ValidationResult {
    fn rejected(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
            warnings: Vec::new(),
            store_id: None,
        }
    }
}

/// Proof that a launch request passed validation.
///
/// Only the validator can construct one, and deployments can only be
/// started from one.
#[derive(Debug, Clone)]
pub struct ValidatedLaunch {
    store_id: String,
    warnings: Vec<String>,
}

impl ValidatedLaunch {
    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// JSON truthiness: null, false, zero, and empty strings, arrays and
/// objects are falsy; a missing value is falsy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LaunchValidator;

impl LaunchValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check a launch request. Every passing call mints a new store id.
    pub fn validate(&self, request: &LaunchRequest) -> ValidationResult {
        match self.authorize(request) {
            Ok(launch) => ValidationResult {
                valid: true,
                errors: Vec::new(),
                warnings: launch.warnings,
                store_id: Some(launch.store_id),
            },
            Err(result) => result,
        }
    }

    /// Like [`validate`](Self::validate) but yields the deploy token on success.
    ///
    /// A truthy non-array `products` passes the presence check but counts as
    /// zero products, so it fails the minimum product count.
    pub fn authorize(&self, request: &LaunchRequest) -> Result<ValidatedLaunch, ValidationResult> {
        let config = &request.store_config;

        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|field| !is_truthy(config.get(**field)))
            .map(|field| format!("Missing required field: {}", field))
            .collect();
        if !missing.is_empty() {
            return Err(ValidationResult::rejected(missing));
        }

        // Only an array has a length; anything else counts as zero
        let product_count = config
            .get("products")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        if product_count < MIN_LAUNCH_PRODUCTS {
            return Err(ValidationResult::rejected(vec![format!(
                "Minimum {} products required for launch",
                MIN_LAUNCH_PRODUCTS
            )]));
        }

        if !is_truthy(config.get("selectedTheme")) {
            return Err(ValidationResult::rejected(vec![
                "Store theme must be selected".to_string()
            ]));
        }

        let integrations = config.get("integrations");
        let mut warnings = Vec::new();
        if !is_truthy(integrations.and_then(|i| i.get("payment"))) {
            warnings.push("No payment providers configured".to_string());
        }
        if !is_truthy(integrations.and_then(|i| i.get("shipping"))) {
            warnings.push("No shipping providers configured".to_string());
        }

        Ok(ValidatedLaunch {
            store_id: mint_id("store"),
            warnings,
        })
    }
}

//! Policy parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::validate_policy_schema;
use crate::variance::VarianceBands;

/// Errors that can occur when loading a policy.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Failed to read policy file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Policy does not match schema: {}", .0.join("; "))]
    SchemaViolation(Vec<String>),

    #[error("Policy validation failed: {0}")]
    ValidationError(String),
}

/// How the GM rule produces its insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GmRuleMode {
    /// Always surface the FOH labor overrun, regardless of data
    #[default]
    Static,

    /// Surface it only when the `foh-labor` series is over its cutoff
    Computed,
}

/// Owner rule cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnerPolicy {
    /// Net income variance at or below this fires the margin insight
    pub net_income_critical_pct: f64,

    /// Prime cost variance at or above this fires the prime cost insight
    pub prime_cost_critical_pct: f64,
}

impl Default for OwnerPolicy {
    fn default() -> Self {
        Self {
            net_income_critical_pct: -10.0,
            prime_cost_critical_pct: 5.0,
        }
    }
}

/// GM rule configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GmPolicy {
    pub mode: GmRuleMode,

    /// Used in computed mode only
    pub foh_labor_critical_pct: f64,
}

impl Default for GmPolicy {
    fn default() -> Self {
        Self {
            mode: GmRuleMode::Static,
            foh_labor_critical_pct: 5.0,
        }
    }
}

/// Chef rule cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChefPolicy {
    /// COGS variance at or above this fires the food cost insight
    pub cogs_critical_pct: f64,
}

impl Default for ChefPolicy {
    fn default() -> Self {
        Self {
            cogs_critical_pct: 5.0,
        }
    }
}

/// Tunable policy for classification and insight selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub policy_version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub bands: VarianceBands,
    pub owner: OwnerPolicy,
    pub gm: GmPolicy,
    pub chef: ChefPolicy,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            policy_version: "1.0".to_string(),
            name: None,
            bands: VarianceBands::default(),
            owner: OwnerPolicy::default(),
            gm: GmPolicy::default(),
            chef: ChefPolicy::default(),
        }
    }
}

impl Policy {
    /// Parse a policy from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, PolicyError> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a policy from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Load a policy file; `.json` files parse as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    fn from_value(value: serde_json::Value) -> Result<Self, PolicyError> {
        validate_policy_schema(&value).map_err(PolicyError::SchemaViolation)?;
        let policy: Policy = serde_json::from_value(value)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Semantic checks the schema cannot express.
    pub fn validate(&self) -> Result<(), PolicyError> {
        let cutoffs = [
            ("bands.monitor_band", self.bands.monitor_band),
            ("owner.net_income_critical_pct", self.owner.net_income_critical_pct),
            ("owner.prime_cost_critical_pct", self.owner.prime_cost_critical_pct),
            ("gm.foh_labor_critical_pct", self.gm.foh_labor_critical_pct),
            ("chef.cogs_critical_pct", self.chef.cogs_critical_pct),
        ];

        for (field, value) in cutoffs {
            if !value.is_finite() {
                return Err(PolicyError::ValidationError(format!(
                    "{} must be a finite number",
                    field
                )));
            }
        }

        if self.bands.monitor_band <= 0.0 {
            return Err(PolicyError::ValidationError(
                "bands.monitor_band must be positive".to_string(),
            ));
        }

        if self.owner.net_income_critical_pct > 0.0 {
            return Err(PolicyError::ValidationError(
                "owner.net_income_critical_pct is a shortfall and must not be positive".to_string(),
            ));
        }

        let overruns = [
            ("owner.prime_cost_critical_pct", self.owner.prime_cost_critical_pct),
            ("gm.foh_labor_critical_pct", self.gm.foh_labor_critical_pct),
            ("chef.cogs_critical_pct", self.chef.cogs_critical_pct),
        ];
        if let Some((field, _)) = overruns.iter().find(|(_, value)| *value < 0.0) {
            return Err(PolicyError::ValidationError(format!(
                "{} is an overrun and must not be negative",
                field
            )));
        }

        Ok(())
    }
}

//! Insight rules, grouped into an ordered rule book per role.
//!
//! Each rule answers one question about one metric and either fires an
//! [`Insight`], declines, or is skipped because its series is missing.
//! Rules are independent: none sees another rule's outcome.

mod chef;
mod gm;
mod owner;

pub use chef::FoodCostRule;
pub use gm::FohLaborRule;
pub use owner::{NetIncomeMarginRule, PrimeCostRule};

use serde::{Deserialize, Serialize};

use crate::insight::Insight;
use crate::policy::Policy;
use crate::types::{find_series, MetricTrendSeries, MonthlyDataPoint, Role};

/// Why a rule could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "metric", rename_all = "snake_case")]
pub enum SkipReason {
    /// No series with the rule's metric id
    MissingSeries(String),

    /// Series present but has no data points
    EmptySeries(String),

    /// Latest point has a NaN or infinite actual, target or variance
    NonFiniteValue(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingSeries(id) => write!(f, "no '{}' series supplied", id),
            SkipReason::EmptySeries(id) => write!(f, "'{}' series has no data", id),
            SkipReason::NonFiniteValue(id) => write!(f, "latest '{}' point is not a finite number", id),
        }
    }
}

/// Result of evaluating one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RuleOutcome {
    Fired { insight: Insight },
    NotTriggered { variance_pct: f64 },
    Skipped { reason: SkipReason },
}

impl RuleOutcome {
    pub fn is_fired(&self) -> bool {
        matches!(self, RuleOutcome::Fired { .. })
    }
}

/// Trait for all insight rules.
pub trait InsightRule: Send + Sync {
    /// Stable id used in traces, e.g. `owner.net-income-margin`
    fn rule_id(&self) -> &'static str;

    /// The question this rule asks of the data.
    fn question(&self) -> &'static str;

    /// Evaluate against the supplied series.
    fn evaluate(&self, series: &[MetricTrendSeries], policy: &Policy) -> RuleOutcome;
}

/// The ordered rules consulted for one role. First rule to fire wins.
pub struct RuleBook {
    role: Role,
    rules: Vec<Box<dyn InsightRule>>,
}

impl RuleBook {
    pub fn for_role(role: Role) -> Self {
        let rules: Vec<Box<dyn InsightRule>> = match role {
            Role::Owner => vec![
                Box::new(NetIncomeMarginRule::new()),
                Box::new(PrimeCostRule::new()),
            ],
            Role::Gm => vec![Box::new(FohLaborRule::new())],
            Role::Chef => vec![Box::new(FoodCostRule::new())],
        };
        Self { role, rules }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn rules(&self) -> &[Box<dyn InsightRule>] {
        &self.rules
    }
}

/// Latest usable point of a metric, or why there is none.
pub(crate) fn latest_in<'a>(
    series: &'a [MetricTrendSeries],
    metric_id: &str,
) -> Result<(&'a MetricTrendSeries, &'a MonthlyDataPoint), SkipReason> {
    let found = find_series(series, metric_id)
        .ok_or_else(|| SkipReason::MissingSeries(metric_id.to_string()))?;
    let point = found
        .latest()
        .ok_or_else(|| SkipReason::EmptySeries(metric_id.to_string()))?;
    if !(point.actual.is_finite() && point.target.is_finite() && point.variance_pct.is_finite()) {
        return Err(SkipReason::NonFiniteValue(metric_id.to_string()));
    }
    Ok((found, point))
}

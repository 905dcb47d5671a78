//! GM rule: front-of-house labor.
//!
//! In `static` mode the rule always fires with the fixed FOH labor figures
//! the dashboard has always shown. In `computed` mode it reads the
//! `foh-labor` series like the other roles' rules.

use crate::insight::{Insight, Severity};
use crate::policy::{GmRuleMode, Policy};
use crate::types::{MetricTrendSeries, MetricUnit, MonthlyDataPoint};

use super::{latest_in, InsightRule, RuleOutcome};

pub const FOH_LABOR_METRIC: &str = "foh-labor";

/// Fixed figures surfaced in static mode (labor as % of sales).
const STATIC_FOH_ACTUAL: f64 = 24.8;
const STATIC_FOH_TARGET: f64 = 21.0;

pub struct FohLaborRule;

impl FohLaborRule {
    pub fn new() -> Self {
        Self
    }

    fn build(metric: &str, unit: MetricUnit, point: &MonthlyDataPoint) -> Insight {
        let insight = Insight::from_point("gm-foh-labor", Severity::Critical, metric, unit, point);
        let detail = format!(
            "Front-of-house labor is at {} of sales against a {} target. Tighten server and host scheduling on slower shifts.",
            insight.value,
            insight.target.as_deref().unwrap_or("n/a")
        );
        insight
            .with_message("FOH labor is running over budget")
            .with_detail(detail)
            .with_call_to_action("Review FOH schedule")
    }
}

impl Default for FohLaborRule {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightRule for FohLaborRule {
    fn rule_id(&self) -> &'static str {
        "gm.foh-labor"
    }

    fn question(&self) -> &'static str {
        "Is front-of-house labor over budget?"
    }

    fn evaluate(&self, series: &[MetricTrendSeries], policy: &Policy) -> RuleOutcome {
        match policy.gm.mode {
            GmRuleMode::Static => {
                let point = MonthlyDataPoint::new("Current", STATIC_FOH_ACTUAL, STATIC_FOH_TARGET);
                RuleOutcome::Fired {
                    insight: Self::build("FOH Labor", MetricUnit::Percentage, &point),
                }
            }
            GmRuleMode::Computed => {
                let (metric, point) = match latest_in(series, FOH_LABOR_METRIC) {
                    Ok(found) => found,
                    Err(reason) => return RuleOutcome::Skipped { reason },
                };

                let fires = point.variance_pct >= policy.gm.foh_labor_critical_pct;
                if !fires {
                    return RuleOutcome::NotTriggered {
                        variance_pct: point.variance_pct,
                    };
                }

                RuleOutcome::Fired {
                    insight: Self::build(&metric.name, metric.unit, point),
                }
            }
        }
    }
}

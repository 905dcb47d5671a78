//! Chef rule: food cost (COGS).

use crate::insight::{Insight, Severity};
use crate::policy::Policy;
use crate::types::MetricTrendSeries;

use super::{latest_in, InsightRule, RuleOutcome};

pub const COGS_METRIC: &str = "cogs";

/// Fires when COGS overruns its target.
pub struct FoodCostRule;

impl FoodCostRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FoodCostRule {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightRule for FoodCostRule {
    fn rule_id(&self) -> &'static str {
        "chef.food-cost"
    }

    fn question(&self) -> &'static str {
        "Is food cost critically over target?"
    }

    fn evaluate(&self, series: &[MetricTrendSeries], policy: &Policy) -> RuleOutcome {
        let (metric, point) = match latest_in(series, COGS_METRIC) {
            Ok(found) => found,
            Err(reason) => return RuleOutcome::Skipped { reason },
        };

        let fires = point.variance_pct >= policy.chef.cogs_critical_pct;
        if !fires {
            return RuleOutcome::NotTriggered {
                variance_pct: point.variance_pct,
            };
        }

        let insight = Insight::from_point(
            "chef-food-cost",
            Severity::Critical,
            &metric.name,
            metric.unit,
            point,
        );
        let message = format!("Food cost is running {:.1}% over target", point.variance_pct);
        let detail = format!(
            "{} hit {} against a {} target for {}. Check waste logs, portioning and recent supplier price changes.",
            metric.name,
            insight.value,
            insight.target.as_deref().unwrap_or("n/a"),
            point.period
        );

        RuleOutcome::Fired {
            insight: insight
                .with_message(message)
                .with_detail(detail)
                .with_call_to_action("Review food cost"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MetricUnit, MonthlyDataPoint};

    fn cogs(actual: f64, target: f64) -> Vec<MetricTrendSeries> {
        vec![MetricTrendSeries::new(
            COGS_METRIC,
            "Food Cost",
            MetricUnit::Percentage,
            true,
            vec![MonthlyDataPoint::new("Dec", actual, target)],
        )]
    }

    #[test]
    fn test_fires_on_overrun() {
        let outcome = FoodCostRule::new().evaluate(&cogs(31.0, 24.0), &Policy::default());
        match outcome {
            RuleOutcome::Fired { insight } => {
                assert_eq!(insight.id, "chef-food-cost");
                assert_eq!(insight.variance, "+29.2%");
                assert!(insight.message.contains("Food cost"));
            }
            other => panic!("expected fired, got {:?}", other),
        }
    }

    #[test]
    fn test_under_target_does_not_fire() {
        let outcome = FoodCostRule::new().evaluate(&cogs(23.0, 24.0), &Policy::default());
        assert!(!outcome.is_fired());
    }
}

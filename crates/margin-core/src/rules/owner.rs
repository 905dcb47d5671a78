//! Owner rules: margin first, then prime cost.

use crate::insight::{Insight, Severity};
use crate::policy::Policy;
use crate::types::MetricTrendSeries;

use super::{latest_in, InsightRule, RuleOutcome};

pub const NET_INCOME_METRIC: &str = "net-income";
pub const PRIME_COST_METRIC: &str = "prime-cost";

/// Fires when net income falls far enough below target to threaten margin.
pub struct NetIncomeMarginRule;

impl NetIncomeMarginRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NetIncomeMarginRule {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightRule for NetIncomeMarginRule {
    fn rule_id(&self) -> &'static str {
        "owner.net-income-margin"
    }

    fn question(&self) -> &'static str {
        "Is net income margin critically below target?"
    }

    fn evaluate(&self, series: &[MetricTrendSeries], policy: &Policy) -> RuleOutcome {
        let (metric, point) = match latest_in(series, NET_INCOME_METRIC) {
            Ok(found) => found,
            Err(reason) => return RuleOutcome::Skipped { reason },
        };

        let fires = point.variance_pct <= policy.owner.net_income_critical_pct;
        if !fires {
            return RuleOutcome::NotTriggered {
                variance_pct: point.variance_pct,
            };
        }

        let insight = Insight::from_point(
            "owner-net-income-margin",
            Severity::Critical,
            &metric.name,
            metric.unit,
            point,
        );
        let message = format!(
            "Net margin is running {:.1}% below target",
            point.variance_pct.abs()
        );
        let detail = format!(
            "{} came in at {} against a {} target for {}. Prime cost and operating expenses are the usual drivers; review both before the period closes.",
            metric.name,
            insight.value,
            insight.target.as_deref().unwrap_or("n/a"),
            point.period
        );

        RuleOutcome::Fired {
            insight: insight
                .with_message(message)
                .with_detail(detail)
                .with_call_to_action("Review cost drivers"),
        }
    }
}

/// Fires when prime cost (COGS + labor) overruns its target.
pub struct PrimeCostRule;

impl PrimeCostRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PrimeCostRule {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightRule for PrimeCostRule {
    fn rule_id(&self) -> &'static str {
        "owner.prime-cost"
    }

    fn question(&self) -> &'static str {
        "Is prime cost critically over target?"
    }

    fn evaluate(&self, series: &[MetricTrendSeries], policy: &Policy) -> RuleOutcome {
        let (metric, point) = match latest_in(series, PRIME_COST_METRIC) {
            Ok(found) => found,
            Err(reason) => return RuleOutcome::Skipped { reason },
        };

        let fires = point.variance_pct >= policy.owner.prime_cost_critical_pct;
        if !fires {
            return RuleOutcome::NotTriggered {
                variance_pct: point.variance_pct,
            };
        }

        let insight = Insight::from_point(
            "owner-prime-cost",
            Severity::Critical,
            &metric.name,
            metric.unit,
            point,
        );
        let message = format!(
            "Prime cost is running {:.1}% over target",
            point.variance_pct
        );
        let detail = format!(
            "{} reached {} against a {} target for {}. Split it into food cost and labor to find which side moved.",
            metric.name,
            insight.value,
            insight.target.as_deref().unwrap_or("n/a"),
            point.period
        );

        RuleOutcome::Fired {
            insight: insight
                .with_message(message)
                .with_detail(detail)
                .with_call_to_action("Break down prime cost"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::Direction;
    use crate::rules::SkipReason;
    use crate::types::{MetricUnit, MonthlyDataPoint};

    fn pct_series(id: &str, name: &str, inverse: bool, actual: f64, target: f64) -> MetricTrendSeries {
        MetricTrendSeries::new(
            id,
            name,
            MetricUnit::Percentage,
            inverse,
            vec![MonthlyDataPoint::new("Dec", actual, target)],
        )
    }

    #[test]
    fn test_margin_fires_below_cutoff() {
        let series = vec![pct_series(NET_INCOME_METRIC, "Net Income Margin", false, 13.3, 15.0)];
        let outcome = NetIncomeMarginRule::new().evaluate(&series, &Policy::default());
        match outcome {
            RuleOutcome::Fired { insight } => {
                assert_eq!(insight.severity, Severity::Critical);
                assert_eq!(insight.direction, Direction::Down);
                assert!(insight.message.contains("margin"));
                assert_eq!(insight.call_to_action.as_deref(), Some("Review cost drivers"));
            }
            other => panic!("expected fired, got {:?}", other),
        }
    }

    #[test]
    fn test_margin_cutoff_is_inclusive() {
        let series = vec![pct_series(NET_INCOME_METRIC, "Net Income", false, 90.0, 100.0)];
        assert!(NetIncomeMarginRule::new()
            .evaluate(&series, &Policy::default())
            .is_fired());
    }

    #[test]
    fn test_margin_quiet_above_cutoff() {
        let series = vec![pct_series(NET_INCOME_METRIC, "Net Income", false, 92.0, 100.0)];
        let outcome = NetIncomeMarginRule::new().evaluate(&series, &Policy::default());
        assert!(matches!(outcome, RuleOutcome::NotTriggered { .. }));
    }

    #[test]
    fn test_prime_cost_fires_at_cutoff() {
        let series = vec![pct_series(PRIME_COST_METRIC, "Prime Cost", true, 63.0, 60.0)];
        let outcome = PrimeCostRule::new().evaluate(&series, &Policy::default());
        match outcome {
            RuleOutcome::Fired { insight } => {
                assert_eq!(insight.id, "owner-prime-cost");
                assert_eq!(insight.direction, Direction::Up);
            }
            other => panic!("expected fired, got {:?}", other),
        }
    }

    #[test]
    fn test_prime_cost_missing_is_skipped() {
        let outcome = PrimeCostRule::new().evaluate(&[], &Policy::default());
        assert_eq!(
            outcome,
            RuleOutcome::Skipped {
                reason: SkipReason::MissingSeries(PRIME_COST_METRIC.to_string())
            }
        );
    }

    #[test]
    fn test_cutoff_comes_from_policy() {
        let series = vec![pct_series(NET_INCOME_METRIC, "Net Income", false, 95.0, 100.0)];
        let mut policy = Policy::default();
        policy.owner.net_income_critical_pct = -4.0;
        assert!(NetIncomeMarginRule::new().evaluate(&series, &policy).is_fired());
    }
}

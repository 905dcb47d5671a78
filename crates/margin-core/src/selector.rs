//! Role insight selector.
//!
//! Walks a role's rule book top to bottom and returns the first insight that
//! fires. Later rules are never evaluated once one fires. When nothing fires,
//! including when no series were supplied at all, the positive on-track
//! insight is returned.
//!
//! [`evaluate_rules`] runs the whole book instead, for auditing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::insight::Insight;
use crate::policy::Policy;
use crate::rules::{RuleBook, RuleOutcome};
use crate::types::{MetricTrendSeries, Role};

/// One evaluated rule in a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTrace {
    pub rule_id: String,
    pub question: String,
    #[serde(flatten)]
    pub outcome: RuleOutcome,
}

/// The selected insight plus the rules consulted to reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub role: Role,
    pub insight: Insight,
    pub trace: Vec<RuleTrace>,
}

/// Select the primary insight with the default policy.
pub fn select_primary_insight(role: Role, series: &[MetricTrendSeries]) -> Insight {
    select_primary_insight_with(role, series, &Policy::default())
}

/// Select the primary insight with an explicit policy.
pub fn select_primary_insight_with(
    role: Role,
    series: &[MetricTrendSeries],
    policy: &Policy,
) -> Insight {
    select(role, series, policy).insight
}

/// Select and keep the rule trace.
pub fn select(role: Role, series: &[MetricTrendSeries], policy: &Policy) -> Selection {
    let book = RuleBook::for_role(role);
    let mut trace = Vec::with_capacity(book.rules().len());

    for rule in book.rules() {
        let outcome = rule.evaluate(series, policy);

        match &outcome {
            RuleOutcome::Fired { insight } => {
                debug!(role = %role, rule = rule.rule_id(), insight = %insight.id, "Rule fired");
            }
            RuleOutcome::NotTriggered { variance_pct } => {
                debug!(role = %role, rule = rule.rule_id(), variance_pct, "Rule not triggered");
            }
            RuleOutcome::Skipped { reason } => {
                debug!(role = %role, rule = rule.rule_id(), reason = %reason, "Rule skipped");
            }
        }

        let fired = match &outcome {
            RuleOutcome::Fired { insight } => Some(insight.clone()),
            _ => None,
        };

        trace.push(RuleTrace {
            rule_id: rule.rule_id().to_string(),
            question: rule.question().to_string(),
            outcome,
        });

        if let Some(insight) = fired {
            return Selection {
                role,
                insight,
                trace,
            };
        }
    }

    debug!(role = %role, "No rule fired, using on-track insight");
    Selection {
        role,
        insight: Insight::on_track(),
        trace,
    }
}

/// Evaluate every rule in the role's book, without stopping at the first
/// one that fires.
pub fn evaluate_rules(role: Role, series: &[MetricTrendSeries], policy: &Policy) -> Vec<RuleTrace> {
    RuleBook::for_role(role)
        .rules()
        .iter()
        .map(|rule| RuleTrace {
            rule_id: rule.rule_id().to_string(),
            question: rule.question().to_string(),
            outcome: rule.evaluate(series, policy),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::{Direction, Severity};
    use crate::policy::GmRuleMode;
    use crate::types::{MetricUnit, MonthlyDataPoint};

    fn pct(id: &str, inverse: bool, actual: f64, target: f64) -> MetricTrendSeries {
        MetricTrendSeries::new(
            id,
            id,
            MetricUnit::Percentage,
            inverse,
            vec![MonthlyDataPoint::new("Dec", actual, target)],
        )
    }

    #[test]
    fn test_owner_margin_takes_precedence() {
        let series = vec![
            pct("net-income", false, 13.3, 15.0),
            pct("prime-cost", true, 70.0, 60.0),
        ];
        let selection = select(Role::Owner, &series, &Policy::default());

        assert_eq!(selection.insight.id, "owner-net-income-margin");
        // Prime cost rule never evaluated
        assert_eq!(selection.trace.len(), 1);
    }

    #[test]
    fn test_owner_falls_through_to_prime_cost() {
        let series = vec![
            pct("net-income", false, 15.5, 15.0),
            pct("prime-cost", true, 66.0, 60.0),
        ];
        let insight = select_primary_insight(Role::Owner, &series);
        assert_eq!(insight.id, "owner-prime-cost");
        assert_eq!(insight.severity, Severity::Critical);
    }

    #[test]
    fn test_owner_missing_net_income_still_checks_prime_cost() {
        let series = vec![pct("prime-cost", true, 66.0, 60.0)];
        let selection = select(Role::Owner, &series, &Policy::default());
        assert_eq!(selection.insight.id, "owner-prime-cost");
        assert!(matches!(selection.trace[0].outcome, RuleOutcome::Skipped { .. }));
    }

    #[test]
    fn test_gm_static_always_fires() {
        let insight = select_primary_insight(Role::Gm, &[]);
        assert_eq!(insight.id, "gm-foh-labor");
        assert_eq!(insight.severity, Severity::Critical);
    }

    #[test]
    fn test_gm_computed_defaults_without_data() {
        let mut policy = Policy::default();
        policy.gm.mode = GmRuleMode::Computed;
        let insight = select_primary_insight_with(Role::Gm, &[], &policy);
        assert!(insight.is_default());
    }

    #[test]
    fn test_chef_default_when_empty() {
        let insight = select_primary_insight(Role::Chef, &[]);
        assert!(insight.is_default());
        assert_eq!(insight.severity, Severity::Positive);
        assert_eq!(insight.direction, Direction::Flat);
        assert!(insight.target.is_none());
    }

    #[test]
    fn test_trace_serializes_flat() {
        let selection = select(Role::Chef, &[], &Policy::default());
        let value = serde_json::to_value(&selection).unwrap();
        assert_eq!(value["trace"][0]["rule_id"], "chef.food-cost");
        assert_eq!(value["trace"][0]["outcome"], "skipped");
    }

    #[test]
    fn test_evaluate_rules_does_not_short_circuit() {
        let series = vec![
            pct("net-income", false, 13.3, 15.0),
            pct("prime-cost", true, 70.0, 60.0),
        ];
        let trace = evaluate_rules(Role::Owner, &series, &Policy::default());

        assert_eq!(trace.len(), 2);
        assert!(trace.iter().all(|t| t.outcome.is_fired()));
        assert_eq!(trace[1].rule_id, "owner.prime-cost");
    }

    #[test]
    fn test_nan_actual_never_fires_a_rule() {
        let mut computed = Policy::default();
        computed.gm.mode = GmRuleMode::Computed;

        let cases = [
            (Role::Owner, vec![pct("net-income", false, f64::NAN, 15.0), pct("prime-cost", true, f64::NAN, 60.0)], Policy::default()),
            (Role::Gm, vec![pct("foh-labor", true, f64::NAN, 21.0)], computed),
            (Role::Chef, vec![pct("cogs", true, f64::NAN, 24.0)], Policy::default()),
        ];

        for (role, series, policy) in cases {
            let selection = select(role, &series, &policy);
            assert!(selection.insight.is_default(), "{} fired on NaN", role);
            assert!(selection.trace.iter().all(|t| matches!(
                t.outcome,
                RuleOutcome::Skipped { reason: crate::rules::SkipReason::NonFiniteValue(_) }
            )));
        }
    }

    #[test]
    fn test_nan_prime_cost_does_not_hide_behind_margin() {
        // Margin is fine, prime cost is garbage: fall through to default.
        let series = vec![
            pct("net-income", false, 15.5, 15.0),
            pct("prime-cost", true, 60.0, f64::NAN),
        ];
        assert!(select_primary_insight(Role::Owner, &series).is_default());
    }
}

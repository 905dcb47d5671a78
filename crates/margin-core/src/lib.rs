//! # margin-core
//!
//! Deterministic P&L insight engine for restaurant dashboards.
//!
//! This crate answers, for a given role:
//! - How far is each metric from target, and does it matter?
//! - What does the week, quarter or year look like when rolled up?
//! - Which single insight should this role see first?
//!
//! ## Key Guarantees
//!
//! 1. **Pure**: no I/O during classification or selection
//! 2. **Total**: missing or empty series degrade to defaults, never errors
//! 3. **Ordered**: rules are evaluated top to bottom and the first match wins
//!
//! ## Example
//!
//! ```rust
//! use margin_core::{fixtures, select_primary_insight, Role, Severity};
//!
//! let series = fixtures::demo_series();
//! let insight = select_primary_insight(Role::Chef, &series);
//! assert_eq!(insight.severity, Severity::Critical);
//! ```

pub mod aggregate;
pub mod fixtures;
pub mod insight;
pub mod policy;
pub mod report;
pub mod rules;
pub mod scorecard;
pub mod selector;
pub mod series;
pub mod types;
pub mod variance;

// Re-export main types at crate root
pub use aggregate::{aggregate, aggregate_all, Window};
pub use insight::{ActionItem, Direction, Insight, Severity};
pub use policy::{GmRuleMode, Policy, PolicyError};
pub use report::build_report;
pub use rules::{InsightRule, RuleBook, RuleOutcome, SkipReason};
pub use scorecard::{build_scorecard, Scorecard, ScorecardEntry};
pub use selector::{evaluate_rules, select, select_primary_insight, select_primary_insight_with, RuleTrace, Selection};
pub use series::SeriesError;
pub use types::{MetricTrendSeries, MetricUnit, MonthlyDataPoint, ParseRoleError, Role};
pub use variance::{classify, classify_with, Classification, VarianceBands, VarianceStatus};

/// Everything a role's dashboard needs for one window.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DashboardView {
    pub selection: Selection,
    pub scorecard: Scorecard,
}

/// Roll the series up over `window`, then select the primary insight and
/// build the scorecard from the rolled-up data.
pub fn dashboard_view(
    role: Role,
    series: &[MetricTrendSeries],
    window: Window,
    policy: &Policy,
) -> DashboardView {
    let rolled = aggregate_all(series, window);
    let selection = select(role, &rolled, policy);
    let scorecard = build_scorecard(role, series, window, &policy.bands);

    DashboardView {
        selection,
        scorecard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_dashboard_per_role() {
        let series = fixtures::demo_series();
        let policy = Policy::default();

        let owner = dashboard_view(Role::Owner, &series, Window::Month, &policy);
        assert_eq!(owner.selection.insight.id, "owner-net-income-margin");
        assert_eq!(owner.scorecard.entries.len(), series.len());

        let gm = dashboard_view(Role::Gm, &series, Window::Month, &policy);
        assert_eq!(gm.selection.insight.id, "gm-foh-labor");

        let chef = dashboard_view(Role::Chef, &series, Window::Month, &policy);
        assert_eq!(chef.selection.insight.id, "chef-food-cost");
        assert!(chef.scorecard.entries.iter().all(|e| Role::Chef.sees(&e.metric_id)));
    }

    #[test]
    fn test_ytd_window_softens_owner_insight() {
        // Averaged over the year, net income sits near target, so the
        // margin rule does not fire; prime cost is also within its band.
        let series = fixtures::demo_series();
        let view = dashboard_view(Role::Owner, &series, Window::Ytd, &Policy::default());
        assert!(view.selection.insight.is_default());
    }
}

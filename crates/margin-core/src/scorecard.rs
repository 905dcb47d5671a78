//! Scorecard and health score for a role's dashboard view.
//!
//! Every in-scope series is rolled up over the window and classified against
//! its own target. The health score weights `ON_TRACK` as a full point and
//! `MONITOR` as half a point, scaled to 0-100.

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, Window};
use crate::types::{MetricTrendSeries, MetricUnit, MonthlyDataPoint, Role};
use crate::variance::{classify_with, Classification, VarianceBands, VarianceStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardEntry {
    pub metric_id: String,
    pub name: String,
    pub unit: MetricUnit,
    pub inverse: bool,
    pub point: MonthlyDataPoint,
    pub classification: Classification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    pub role: Role,
    pub window: Window,
    pub entries: Vec<ScorecardEntry>,
    pub health_score: u8,
}

impl Scorecard {
    /// Entries needing attention, worst first.
    pub fn attention(&self) -> Vec<&ScorecardEntry> {
        let mut flagged: Vec<&ScorecardEntry> = self
            .entries
            .iter()
            .filter(|e| e.classification.status == VarianceStatus::NeedsAttention)
            .collect();
        flagged.sort_by(|a, b| {
            shortfall(b)
                .partial_cmp(&shortfall(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        flagged
    }

    pub fn count(&self, status: VarianceStatus) -> usize {
        self.entries
            .iter()
            .filter(|e| e.classification.status == status)
            .count()
    }
}

/// How far an entry sits on the wrong side of target, in points.
fn shortfall(entry: &ScorecardEntry) -> f64 {
    if entry.inverse {
        entry.classification.variance_pct
    } else {
        -entry.classification.variance_pct
    }
}

/// Build the scorecard for a role over a window. Series outside the role's
/// scope and empty series are left out.
pub fn build_scorecard(
    role: Role,
    series: &[MetricTrendSeries],
    window: Window,
    bands: &VarianceBands,
) -> Scorecard {
    let entries: Vec<ScorecardEntry> = series
        .iter()
        .filter(|s| role.sees(&s.id))
        .filter_map(|s| {
            let point = aggregate(s, window)?;
            let classification = classify_with(point.actual, point.target, s.inverse, bands);
            Some(ScorecardEntry {
                metric_id: s.id.clone(),
                name: s.name.clone(),
                unit: s.unit,
                inverse: s.inverse,
                point,
                classification,
            })
        })
        .collect();

    let health_score = health_score(&entries);

    Scorecard {
        role,
        window,
        entries,
        health_score,
    }
}

/// 0-100; an empty scorecard is perfectly healthy.
pub fn health_score(entries: &[ScorecardEntry]) -> u8 {
    if entries.is_empty() {
        return 100;
    }

    let points: f64 = entries
        .iter()
        .map(|e| match e.classification.status {
            VarianceStatus::OnTrack => 1.0,
            VarianceStatus::Monitor => 0.5,
            VarianceStatus::NeedsAttention => 0.0,
        })
        .sum();

    (points / entries.len() as f64 * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(id: &str, inverse: bool, actual: f64, target: f64) -> MetricTrendSeries {
        MetricTrendSeries::new(
            id,
            id,
            MetricUnit::Percentage,
            inverse,
            vec![MonthlyDataPoint::new("Dec", actual, target)],
        )
    }

    #[test]
    fn test_health_score_weights() {
        let series = vec![
            single("sales", false, 100.0, 100.0),
            single("cogs", true, 103.0, 100.0),
            single("labor", true, 120.0, 100.0),
            single("net-income", false, 80.0, 100.0),
        ];
        let card = build_scorecard(Role::Owner, &series, Window::Month, &VarianceBands::default());
        assert_eq!(card.entries.len(), 4);
        // (1 + 0.5 + 0 + 0) / 4
        assert_eq!(card.health_score, 38);
        assert_eq!(card.count(VarianceStatus::NeedsAttention), 2);
    }

    #[test]
    fn test_attention_sorted_worst_first() {
        let series = vec![
            single("labor", true, 110.0, 100.0),
            single("net-income", false, 70.0, 100.0),
        ];
        let card = build_scorecard(Role::Owner, &series, Window::Month, &VarianceBands::default());
        let flagged = card.attention();
        assert_eq!(flagged[0].metric_id, "net-income");
        assert_eq!(flagged[1].metric_id, "labor");
    }

    #[test]
    fn test_scope_filters_metrics() {
        let series = vec![single("sales", false, 1.0, 1.0), single("cogs", true, 1.0, 1.0)];
        let card = build_scorecard(Role::Chef, &series, Window::Month, &VarianceBands::default());
        assert_eq!(card.entries.len(), 1);
        assert_eq!(card.entries[0].metric_id, "cogs");
    }

    #[test]
    fn test_empty_is_healthy() {
        let card = build_scorecard(Role::Gm, &[], Window::Quarter, &VarianceBands::default());
        assert!(card.entries.is_empty());
        assert_eq!(card.health_score, 100);
    }
}

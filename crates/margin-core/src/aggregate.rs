//! Period roll-ups: week, quarter and year-to-date views over monthly data.
//!
//! Roll-ups never mutate history. Each call synthesizes a new
//! [`MonthlyDataPoint`] whose variance fields are re-derived from the
//! combined actual and target.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::types::{MetricTrendSeries, MetricUnit, MonthlyDataPoint};

/// Approximate weeks in a month, used to scale currency down to a week.
const WEEKS_PER_MONTH: f64 = 4.0;

/// Months in a quarter roll-up.
const QUARTER_MONTHS: usize = 3;

/// Reporting window for a roll-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    /// Latest month as-is
    #[default]
    Month,
    Week,
    Quarter,
    Ytd,
}

impl Window {
    pub fn as_str(&self) -> &'static str {
        match self {
            Window::Month => "month",
            Window::Week => "week",
            Window::Quarter => "quarter",
            Window::Ytd => "ytd",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Window::Month => "Current Month",
            Window::Week => "Current Week",
            Window::Quarter => "Current Quarter",
            Window::Ytd => "Year to Date",
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient: anything unrecognized is the latest month.
impl FromStr for Window {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "week" => Window::Week,
            "quarter" => Window::Quarter,
            "ytd" | "year" => Window::Ytd,
            _ => Window::Month,
        })
    }
}

/// Roll a series up to a single point for the given window.
///
/// Returns `None` for an empty series.
pub fn aggregate(series: &MetricTrendSeries, window: Window) -> Option<MonthlyDataPoint> {
    let last = series.latest()?;

    let point = match window {
        Window::Month => last.clone(),
        Window::Week => match series.unit {
            MetricUnit::Currency => MonthlyDataPoint::new(
                Window::Week.title(),
                last.actual / WEEKS_PER_MONTH,
                last.target / WEEKS_PER_MONTH,
            ),
            MetricUnit::Percentage => {
                MonthlyDataPoint::new(Window::Week.title(), last.actual, last.target)
            }
        },
        Window::Quarter => {
            let start = series.data.len().saturating_sub(QUARTER_MONTHS);
            combine(&series.data[start..], series.unit, Window::Quarter.title())
        }
        Window::Ytd => combine(&series.data, series.unit, Window::Ytd.title()),
    };

    Some(point)
}

/// Roll every series up, keeping only the synthesized point. Empty series
/// pass through empty.
pub fn aggregate_all(series: &[MetricTrendSeries], window: Window) -> Vec<MetricTrendSeries> {
    series
        .iter()
        .map(|s| MetricTrendSeries {
            data: aggregate(s, window).into_iter().collect(),
            ..s.clone()
        })
        .collect()
}

/// Sum (currency) or average (percentage) a non-empty slice of points.
fn combine(points: &[MonthlyDataPoint], unit: MetricUnit, label: &str) -> MonthlyDataPoint {
    let actual: f64 = points.iter().map(|p| p.actual).sum();
    let target: f64 = points.iter().map(|p| p.target).sum();

    match unit {
        MetricUnit::Currency => MonthlyDataPoint::new(label, actual, target),
        MetricUnit::Percentage => {
            let n = points.len().max(1) as f64;
            MonthlyDataPoint::new(label, actual / n, target / n)
        }
    }
}

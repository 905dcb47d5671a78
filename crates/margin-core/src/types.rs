//! Core data model: roles, metric series and their data points.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The dashboard audience. Determines which rule book the selector consults
/// and which metrics are in scope for the role's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Gm,
    Chef,
}

impl Role {
    /// All roles in display order.
    pub const ALL: [Role; 3] = [Role::Owner, Role::Gm, Role::Chef];

    /// Stable identifier used in files, flags and task sources.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Gm => "gm",
            Role::Chef => "chef",
        }
    }

    /// Human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            Role::Owner => "Owner",
            Role::Gm => "General Manager",
            Role::Chef => "Chef",
        }
    }

    /// Metric ids visible to this role, or `None` when every metric is in scope.
    pub fn metric_scope(&self) -> Option<&'static [&'static str]> {
        match self {
            Role::Owner => None,
            Role::Gm => Some(&["sales", "labor", "foh-labor", "prime-cost"]),
            Role::Chef => Some(&["cogs", "food-cost", "prime-cost"]),
        }
    }

    /// Whether a metric id belongs to this role's view.
    pub fn sees(&self, metric_id: &str) -> bool {
        self.metric_scope()
            .map(|scope| scope.contains(&metric_id))
            .unwrap_or(true)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role identifier is not one of `owner`, `gm`, `chef`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role '{0}' (expected owner, gm or chef)")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "gm" | "general-manager" => Ok(Role::Gm),
            "chef" => Ok(Role::Chef),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// Governs whether roll-ups sum (currency) or average (percentage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricUnit {
    Currency,
    Percentage,
}

/// One period of a metric: actual against target, with derived variance.
///
/// Always built through [`MonthlyDataPoint::new`] (deserialization included),
/// so `variance` and `variance_pct` can never drift from `actual`/`target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PointRecord")]
pub struct MonthlyDataPoint {
    pub period: String,
    pub actual: f64,
    pub target: f64,
    pub variance: f64,
    pub variance_pct: f64,
}

impl MonthlyDataPoint {
    pub fn new(period: impl Into<String>, actual: f64, target: f64) -> Self {
        Self {
            period: period.into(),
            actual,
            target,
            variance: actual - target,
            variance_pct: variance_pct(actual, target),
        }
    }
}

/// Signed percentage variance of `actual` against `target`; `0` when the
/// target is zero.
pub fn variance_pct(actual: f64, target: f64) -> f64 {
    if target == 0.0 {
        0.0
    } else {
        (actual - target) / target * 100.0
    }
}

/// Wire shape of a data point. Derived fields in the input are ignored.
#[derive(Deserialize)]
struct PointRecord {
    period: String,
    actual: f64,
    target: f64,
}

impl From<PointRecord> for MonthlyDataPoint {
    fn from(record: PointRecord) -> Self {
        MonthlyDataPoint::new(record.period, record.actual, record.target)
    }
}

/// A chronological series of data points for one financial metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTrendSeries {
    /// Stable identifier, e.g. `net-income`, `prime-cost`, `cogs`
    pub id: String,

    /// Display name, e.g. "Net Income Margin"
    pub name: String,

    pub unit: MetricUnit,

    /// Lower is better (prime cost, COGS, labor)
    #[serde(default)]
    pub inverse: bool,

    /// Oldest first
    #[serde(default)]
    pub data: Vec<MonthlyDataPoint>,
}

impl MetricTrendSeries {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit: MetricUnit,
        inverse: bool,
        data: Vec<MonthlyDataPoint>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit,
            inverse,
            data,
        }
    }

    /// Most recent point, if any.
    pub fn latest(&self) -> Option<&MonthlyDataPoint> {
        self.data.last()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Find a series by metric id.
pub fn find_series<'a>(series: &'a [MetricTrendSeries], id: &str) -> Option<&'a MetricTrendSeries> {
    series.iter().find(|s| s.id == id)
}

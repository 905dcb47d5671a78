//! Insight presentation contract.
//!
//! An [`Insight`] is what display components and downstream collaborators
//! consume. It carries display-ready strings plus enough structure to pick a
//! severity color, build an assistant prompt, or turn the insight into a task.

use serde::{Deserialize, Serialize};

use crate::types::{MetricUnit, MonthlyDataPoint, Role};

/// Id of the fallback insight emitted when no rule fires.
pub const DEFAULT_INSIGHT_ID: &str = "default-on-track";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Positive,
}

impl Severity {
    /// Style class for severity-colored UI.
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Critical => "insight-critical",
            Severity::Warning => "insight-warning",
            Severity::Positive => "insight-positive",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Warning => "Warning",
            Severity::Positive => "Positive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    /// Direction of actual relative to target.
    pub fn of_variance(variance: f64) -> Self {
        if variance > 0.0 {
            Direction::Up
        } else if variance < 0.0 {
            Direction::Down
        } else {
            Direction::Flat
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Flat => "→",
        }
    }
}

/// The single primary insight surfaced to a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    pub severity: Severity,

    /// Metric display name
    pub metric: String,

    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    pub variance: String,
    pub direction: Direction,
    pub message: String,
    pub detail: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_to_action: Option<String>,
}

impl Insight {
    /// Build a metric insight from a data point, formatting values for its unit.
    pub fn from_point(
        id: impl Into<String>,
        severity: Severity,
        metric: impl Into<String>,
        unit: MetricUnit,
        point: &MonthlyDataPoint,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            metric: metric.into(),
            value: format_value(point.actual, unit),
            target: Some(format_value(point.target, unit)),
            variance: format_signed_pct(point.variance_pct),
            direction: Direction::of_variance(point.variance),
            message: String::new(),
            detail: String::new(),
            call_to_action: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn with_call_to_action(mut self, label: impl Into<String>) -> Self {
        self.call_to_action = Some(label.into());
        self
    }

    /// The positive fallback: everything on track, zero variance, no target.
    pub fn on_track() -> Self {
        Self {
            id: DEFAULT_INSIGHT_ID.to_string(),
            severity: Severity::Positive,
            metric: "Overall Performance".to_string(),
            value: "On track".to_string(),
            target: None,
            variance: format_signed_pct(0.0),
            direction: Direction::Flat,
            message: "All key metrics are on track".to_string(),
            detail: "No metric in your view is outside its target band this period.".to_string(),
            call_to_action: None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_INSIGHT_ID
    }

    /// Natural-language prompt for the assistant integration.
    pub fn assistant_prompt(&self) -> String {
        match &self.target {
            Some(target) => format!(
                "Explain why {} is at {} against a target of {} ({} variance) and suggest what to do about it.",
                self.metric, self.value, target, self.variance
            ),
            None => format!(
                "Summarize what is going well with {} this period and what to keep an eye on.",
                self.metric.to_lowercase()
            ),
        }
    }

    /// Default task title when the insight is turned into an action.
    pub fn task_title(&self) -> String {
        format!("Investigate: {}", self.metric)
    }

    /// Task list item for this insight, attributed to a role's dashboard.
    pub fn to_action_item(&self, role: Role) -> ActionItem {
        ActionItem {
            title: self.task_title(),
            source: format!("{}-insight", role.as_str()),
            metric: Some(self.metric.clone()),
            context: Some(self.message.clone()).filter(|m| !m.is_empty()),
        }
    }
}

/// Task list entry contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub title: String,
    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// `$48,250` for currency, `13.3%` for percentages.
pub fn format_value(value: f64, unit: MetricUnit) -> String {
    match unit {
        MetricUnit::Currency => format_currency(value),
        MetricUnit::Percentage => format!("{:.1}%", value),
    }
}

/// Signed percentage with one decimal, e.g. `+29.2%`, `-11.3%`, `0.0%`.
pub fn format_signed_pct(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded > 0.0 {
        format!("+{:.1}%", rounded)
    } else if rounded < 0.0 {
        format!("{:.1}%", rounded)
    } else {
        "0.0%".to_string()
    }
}

/// Whole dollars with thousands separators.
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(48250.0), "$48,250");
        assert_eq!(format_currency(1234567.0), "$1,234,567");
        assert_eq!(format_currency(-1500.0), "-$1,500");
    }

    #[test]
    fn test_format_signed_pct() {
        assert_eq!(format_signed_pct(29.1666), "+29.2%");
        assert_eq!(format_signed_pct(-11.333), "-11.3%");
        assert_eq!(format_signed_pct(0.0), "0.0%");
        assert_eq!(format_signed_pct(-0.01), "0.0%");
    }

    #[test]
    fn test_from_point_formats_by_unit() {
        let point = MonthlyDataPoint::new("Dec", 13.3, 15.0);
        let insight = Insight::from_point("x", Severity::Critical, "Net Income", MetricUnit::Percentage, &point);
        assert_eq!(insight.value, "13.3%");
        assert_eq!(insight.target.as_deref(), Some("15.0%"));
        assert_eq!(insight.variance, "-11.3%");
        assert_eq!(insight.direction, Direction::Down);
    }

    #[test]
    fn test_on_track_has_no_target() {
        let insight = Insight::on_track();
        assert!(insight.is_default());
        assert_eq!(insight.severity, Severity::Positive);
        assert!(insight.target.is_none());
        assert_eq!(insight.direction, Direction::Flat);
        assert_eq!(insight.variance, "0.0%");
    }

    #[test]
    fn test_action_item_from_insight() {
        let point = MonthlyDataPoint::new("Dec", 31.0, 24.0);
        let insight = Insight::from_point("chef-food-cost", Severity::Critical, "Food Cost", MetricUnit::Percentage, &point)
            .with_message("Food cost is over target");
        let item = insight.to_action_item(Role::Chef);
        assert_eq!(item.title, "Investigate: Food Cost");
        assert_eq!(item.source, "chef-insight");
        assert_eq!(item.metric.as_deref(), Some("Food Cost"));
        assert_eq!(item.context.as_deref(), Some("Food cost is over target"));
    }

    #[test]
    fn test_assistant_prompt_mentions_metric() {
        let prompt = Insight::on_track().assistant_prompt();
        assert!(prompt.contains("overall performance"));
    }

    #[test]
    fn test_insight_json_shape() {
        let value = serde_json::to_value(Insight::on_track()).unwrap();
        assert_eq!(value["severity"], "positive");
        assert_eq!(value["direction"], "flat");
        assert!(value.get("target").is_none());
        assert!(value.get("callToAction").is_none());
    }
}

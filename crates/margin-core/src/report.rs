//! Role report builder.
//!
//! Renders a role-specific markdown briefing from the primary insight and,
//! when available, the scorecard it was drawn from.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::insight::{format_signed_pct, format_value, Insight};
use crate::scorecard::Scorecard;
use crate::types::Role;

/// Report headline for a role.
pub fn report_title(role: Role) -> &'static str {
    match role {
        Role::Owner => "Owner P&L Briefing",
        Role::Gm => "General Manager Operations Report",
        Role::Chef => "Kitchen Cost Report",
    }
}

pub fn build_report(
    role: Role,
    insight: &Insight,
    scorecard: Option<&Scorecard>,
    generated_on: NaiveDate,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# {}", report_title(role));
    match scorecard {
        Some(card) => {
            let _ = writeln!(
                output,
                "Generated {} for the {} view ({})",
                generated_on,
                role.title(),
                card.window.title()
            );
        }
        None => {
            let _ = writeln!(output, "Generated {} for the {} view", generated_on, role.title());
        }
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Primary Insight");
    let _ = writeln!(
        output,
        "**[{}] {}** {}",
        insight.severity.label(),
        insight.metric,
        insight.direction.arrow()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "{}", insight.message);
    if !insight.detail.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "{}", insight.detail);
    }
    let _ = writeln!(output);
    match &insight.target {
        Some(target) => {
            let _ = writeln!(
                output,
                "- Actual: {} | Target: {} | Variance: {}",
                insight.value, target, insight.variance
            );
        }
        None => {
            let _ = writeln!(output, "- Status: {}", insight.value);
        }
    }
    if let Some(action) = &insight.call_to_action {
        let _ = writeln!(output, "- Suggested action: {}", action);
    }

    if let Some(card) = scorecard {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Scorecard (health {}/100)", card.health_score);

        if card.entries.is_empty() {
            let _ = writeln!(output, "No metrics recorded for this window.");
        } else {
            let _ = writeln!(output, "| Metric | Actual | Target | Variance | Status |");
            let _ = writeln!(output, "|---|---|---|---|---|");
            for entry in &card.entries {
                let _ = writeln!(
                    output,
                    "| {} | {} | {} | {} | {} |",
                    entry.name,
                    format_value(entry.point.actual, entry.unit),
                    format_value(entry.point.target, entry.unit),
                    format_signed_pct(entry.classification.variance_pct),
                    entry.classification.status.label()
                );
            }
        }

        let flagged = card.attention();
        if !flagged.is_empty() {
            let _ = writeln!(output);
            let _ = writeln!(output, "## Needs Attention");
            for entry in flagged {
                let _ = writeln!(
                    output,
                    "- {}: {} against {}",
                    entry.name,
                    format_value(entry.point.actual, entry.unit),
                    format_value(entry.point.target, entry.unit)
                );
            }
        }
    }

    output
}

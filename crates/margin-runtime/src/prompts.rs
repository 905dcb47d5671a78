//! Prompts for the assistant integration.
//!
//! Layout:
//! 1. Base prompt shared by every role
//! 2. Role preamble
//! 3. The insight itself, rendered as facts the assistant must not contradict

use margin_core::{Insight, Role};

/// Base system prompt shared across roles.
pub const BASE_ASSISTANT_PROMPT: &str = r#"
You are a restaurant finance assistant embedded in a P&L dashboard.

You explain the numbers the dashboard already computed. You do not
recalculate them, and you do not invent figures that are not given to you.

## Ground Rules
1. Treat the actual, target and variance below as correct
2. Keep answers short and concrete: two or three actions at most
3. Name the metric you are talking about in every recommendation
4. If the data does not explain a movement, say so
"#;

pub const OWNER_PREAMBLE: &str = r#"
## Audience: Owner
Focus on margin, prime cost and cash. Frame actions in dollars per month
where the data allows it.
"#;

pub const GM_PREAMBLE: &str = r#"
## Audience: General Manager
Focus on scheduling, labor as a share of sales and guest-facing operations.
Actions should be doable within the next week of shifts.
"#;

pub const CHEF_PREAMBLE: &str = r#"
## Audience: Chef
Focus on food cost, waste, portioning and supplier pricing. Actions should
be doable in the kitchen without owner sign-off.
"#;

pub fn role_preamble(role: Role) -> &'static str {
    match role {
        Role::Owner => OWNER_PREAMBLE,
        Role::Gm => GM_PREAMBLE,
        Role::Chef => CHEF_PREAMBLE,
    }
}

/// Full prompt for asking the assistant about an insight.
pub fn insight_prompt(role: Role, insight: &Insight) -> String {
    let mut prompt = String::with_capacity(1024);
    prompt.push_str(BASE_ASSISTANT_PROMPT.trim_start());
    prompt.push_str(role_preamble(role));
    prompt.push_str("\n## Insight\n");
    prompt.push_str(&format!("- Metric: {}\n", insight.metric));
    prompt.push_str(&format!("- Severity: {}\n", insight.severity.label()));
    prompt.push_str(&format!("- Actual: {}\n", insight.value));
    if let Some(target) = &insight.target {
        prompt.push_str(&format!("- Target: {}\n", target));
    }
    prompt.push_str(&format!("- Variance: {}\n", insight.variance));
    prompt.push_str(&format!("- Summary: {}\n", insight.message));
    prompt.push_str("\n## Question\n");
    prompt.push_str(&insight.assistant_prompt());
    prompt.push('\n');
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use margin_core::{fixtures, select_primary_insight};

    #[test]
    fn test_prompt_layers() {
        let insight = select_primary_insight(Role::Chef, &fixtures::demo_series());
        let prompt = insight_prompt(Role::Chef, &insight);

        assert!(prompt.starts_with("You are a restaurant finance assistant"));
        assert!(prompt.contains("## Audience: Chef"));
        assert!(prompt.contains("- Metric: Food Cost"));
        assert!(prompt.contains("- Target: 24.0%"));
        assert!(prompt.ends_with('\n'));
    }

    #[test]
    fn test_default_insight_has_no_target_line() {
        let prompt = insight_prompt(Role::Owner, &Insight::on_track());
        assert!(!prompt.contains("- Target:"));
        assert!(prompt.contains("## Audience: Owner"));
    }
}

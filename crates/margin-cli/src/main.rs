//! `margin` command line interface.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use margin_core::insight::{format_signed_pct, format_value};
use margin_core::{classify, Insight, Policy, Role, RuleOutcome, Scorecard, Selection, Window};
use margin_runtime::{DashboardService, FileSource, FixtureSource, MetricSource, RuntimeConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "margin", about = "Role-based P&L insights for restaurant dashboards")]
#[command(version)]
struct Cli {
    /// Log rule evaluation and collaborator calls
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single actual against its target
    Classify {
        #[arg(long, allow_hyphen_values = true)]
        actual: f64,

        #[arg(long, allow_hyphen_values = true)]
        target: f64,

        /// Lower is better for this metric
        #[arg(long)]
        inverse: bool,
    },

    /// Show the primary insight for a role
    Insight {
        #[command(flatten)]
        view: ViewArgs,

        #[arg(long)]
        json: bool,

        /// Print each rule that was evaluated
        #[arg(long)]
        trace: bool,
    },

    /// Show the metric scorecard for a role
    Scorecard {
        #[command(flatten)]
        view: ViewArgs,

        #[arg(long)]
        json: bool,
    },

    /// Render the markdown report for a role
    Report {
        #[command(flatten)]
        view: ViewArgs,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Email the report for a role
    Email {
        #[command(flatten)]
        view: ViewArgs,

        /// Recipient address (repeatable)
        #[arg(long, required = true)]
        to: Vec<String>,
    },

    /// Turn the role's primary insight into a task
    Task {
        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// owner, gm or chef
    #[arg(short, long)]
    role: Role,

    /// month, week, quarter or ytd
    #[arg(short, long, default_value = "month")]
    window: Window,

    /// Series file (YAML or JSON); demo data when omitted
    #[arg(long)]
    data: Option<PathBuf>,

    /// Policy file (YAML or JSON)
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Runtime config (YAML): mailer, retry and cache settings
    #[arg(long)]
    config: Option<PathBuf>,
}

impl ViewArgs {
    fn service(&self) -> Result<DashboardService> {
        let config = match &self.config {
            Some(path) => RuntimeConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => RuntimeConfig::default(),
        };

        let policy = match &self.policy {
            Some(path) => Policy::from_file(path)
                .with_context(|| format!("Failed to load policy from {}", path.display()))?,
            None => Policy::default(),
        };

        tracing::debug!(
            role = %self.role,
            window = self.window.as_str(),
            data = ?self.data,
            policy = ?self.policy,
            config = ?self.config,
            "Building dashboard service"
        );

        let source: Arc<dyn MetricSource> = match &self.data {
            Some(path) => Arc::new(FileSource::new(path)),
            None => Arc::new(FixtureSource),
        };

        DashboardService::new(source, policy, &config).context("Failed to set up the dashboard")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Classify {
            actual,
            target,
            inverse,
        } => {
            let result = classify(actual, target, inverse);
            println!(
                "{} ({})",
                result.status.label(),
                format_signed_pct(result.variance_pct)
            );
        }

        Commands::Insight { view, json, trace } => {
            let service = view.service()?;
            let dashboard = service.view(view.role, view.window).await?;
            let selection = &dashboard.selection;

            if json {
                let value = if trace {
                    serde_json::to_string_pretty(selection)?
                } else {
                    serde_json::to_string_pretty(&selection.insight)?
                };
                println!("{}", value);
            } else {
                print_insight(&selection.insight);
                if trace {
                    print_trace(selection);
                }
            }
        }

        Commands::Scorecard { view, json } => {
            let service = view.service()?;
            let dashboard = service.view(view.role, view.window).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&dashboard.scorecard)?);
            } else {
                print_scorecard(&dashboard.scorecard);
            }
        }

        Commands::Report { view, out } => {
            let service = view.service()?;
            let report = service.report(view.role, view.window).await?;

            match out {
                Some(path) => {
                    std::fs::write(&path, report)
                        .with_context(|| format!("Failed to write report to {}", path.display()))?;
                    println!("Report written to {}", path.display());
                }
                None => print!("{}", report),
            }
        }

        Commands::Email { view, to } => {
            let service = view.service()?;

            println!("Sending {} report to {}...", view.role.title(), to.join(", "));
            let receipt = service
                .email_report(view.role, view.window, to)
                .await
                .context("Email failed")?;
            println!(
                "Sent {} from {} to {} recipient(s) after {} attempt(s)",
                receipt.message_id, receipt.from, receipt.recipients, receipt.attempts
            );
        }

        Commands::Task { view } => {
            let service = view.service()?;
            let id = service.add_insight_task(view.role, view.window).await?;

            for task in service.tasks().list().await.iter().filter(|t| t.id == id) {
                println!("{} {}", task.id, task.item.title);
                println!("  source: {}", task.item.source);
                if let Some(context) = &task.item.context {
                    println!("  context: {}", context);
                }
            }
        }
    }

    Ok(())
}

fn print_insight(insight: &Insight) {
    println!("[{}] {}", insight.severity.label(), insight.metric);
    if insight.is_default() {
        println!("  {}", insight.message);
        return;
    }

    match &insight.target {
        Some(target) => println!(
            "  {} vs {} target ({} {})",
            insight.value,
            target,
            insight.direction.arrow(),
            insight.variance
        ),
        None => println!("  {} ({})", insight.value, insight.variance),
    }
    println!("  {}", insight.message);
    if !insight.detail.is_empty() {
        println!("  {}", insight.detail);
    }
    if let Some(cta) = &insight.call_to_action {
        println!("  -> {}", cta);
    }
}

fn print_trace(selection: &Selection) {
    println!();
    println!("Rules evaluated for {}:", selection.role.title());
    for step in &selection.trace {
        let outcome = match &step.outcome {
            RuleOutcome::Fired { insight } => format!("fired ({})", insight.id),
            RuleOutcome::NotTriggered { variance_pct } => {
                format!("not triggered ({})", format_signed_pct(*variance_pct))
            }
            RuleOutcome::Skipped { reason } => format!("skipped ({})", reason),
        };
        println!("  {:<28} {}", step.rule_id, outcome);
    }
}

fn print_scorecard(card: &Scorecard) {
    println!("{} scorecard, {}", card.role.title(), card.window.title());
    println!("Health score: {}/100", card.health_score);
    println!();
    println!("{:<18} {:>12} {:>12} {:>9}  Status", "Metric", "Actual", "Target", "Variance");
    for entry in &card.entries {
        println!(
            "{:<18} {:>12} {:>12} {:>9}  {}",
            entry.name,
            format_value(entry.point.actual, entry.unit),
            format_value(entry.point.target, entry.unit),
            format_signed_pct(entry.classification.variance_pct),
            entry.classification.status.label()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_insight_args() {
        let cli = Cli::try_parse_from(["margin", "insight", "--role", "general-manager", "-w", "ytd", "--trace"])
            .unwrap();
        match cli.command {
            Commands::Insight { view, json, trace } => {
                assert_eq!(view.role, Role::Gm);
                assert_eq!(view.window, Window::Ytd);
                assert!(trace);
                assert!(!json);
            }
            _ => panic!("expected insight command"),
        }
    }

    #[test]
    fn test_negative_classify_values() {
        let cli = Cli::try_parse_from(["margin", "classify", "--actual", "-3.5", "--target", "10"]).unwrap();
        assert!(matches!(cli.command, Commands::Classify { actual, .. } if actual == -3.5));
    }

    #[test]
    fn test_config_flag_on_every_view_command() {
        let cli = Cli::try_parse_from(["margin", "email", "-r", "owner", "--to", "a@b.com", "--config", "margin.yaml"])
            .unwrap();
        match cli.command {
            Commands::Email { view, to } => {
                assert_eq!(view.config, Some(PathBuf::from("margin.yaml")));
                assert_eq!(to, vec!["a@b.com".to_string()]);
            }
            _ => panic!("expected email command"),
        }
        assert!(Cli::try_parse_from(["margin", "report", "-r", "chef", "--config", "margin.yaml"]).is_ok());
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(Cli::try_parse_from(["margin", "task", "--role", "sommelier"]).is_err());
    }
}

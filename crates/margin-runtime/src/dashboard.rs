//! Dashboard service.
//!
//! Loads series from a [`MetricSource`], computes the view for a role and
//! window, and caches it. Also the place where the collaborators meet: an
//! insight can be turned into a task, handed to the assistant, or mailed
//! out as a report.

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use margin_core::report::report_title;
use margin_core::{build_report, dashboard_view, fixtures, series, DashboardView, MetricTrendSeries, Policy, Role, SeriesError, Window};
use moka::future::Cache;
use std::path::PathBuf;
use std::sync::Arc;

use crate::assistant::{Assistant, PromptLog};
use crate::config::RuntimeConfig;
use crate::mailer::{DeliveryReceipt, EmailReport, ReportMailer, RetryingMailer, SimulatedMailer};
use crate::prompts::insight_prompt;
use crate::tasks::{InMemoryTaskList, TaskId, TaskList};
use crate::RuntimeError;

/// Where the dashboard gets its series from.
#[async_trait]
pub trait MetricSource: Send + Sync {
    async fn load(&self) -> Result<Vec<MetricTrendSeries>, RuntimeError>;

    fn describe(&self) -> String;
}

/// Built-in twelve month demo data.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSource;

#[async_trait]
impl MetricSource for FixtureSource {
    async fn load(&self) -> Result<Vec<MetricTrendSeries>, RuntimeError> {
        Ok(fixtures::demo_series())
    }

    fn describe(&self) -> String {
        "demo fixtures".to_string()
    }
}

/// A YAML or JSON series document on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MetricSource for FileSource {
    async fn load(&self) -> Result<Vec<MetricTrendSeries>, RuntimeError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(SeriesError::from)?;

        let loaded = match self.path.extension().and_then(|e| e.to_str()) {
            Some("json") => series::from_json(&contents)?,
            _ => series::from_yaml(&contents)?,
        };
        tracing::debug!(path = %self.path.display(), series = loaded.len(), "Series loaded");
        Ok(loaded)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct DashboardService {
    source: Arc<dyn MetricSource>,
    policy: Policy,
    cache: Cache<(Role, Window), Arc<DashboardView>>,
    tasks: Arc<dyn TaskList>,
    assistant: Arc<dyn Assistant>,
    mailer: Arc<dyn ReportMailer>,
    from_address: String,
}

impl DashboardService {
    /// Service with in-memory collaborators and a retrying simulated mailer,
    /// all configured from `config`.
    pub fn new(
        source: Arc<dyn MetricSource>,
        policy: Policy,
        config: &RuntimeConfig,
    ) -> Result<Self, RuntimeError> {
        let mailer = RetryingMailer::new(
            SimulatedMailer::from_config(&config.mailer)?,
            config.retry.clone(),
        );

        Ok(Self {
            source,
            policy,
            cache: Cache::builder()
                .max_capacity(config.cache.max_entries)
                .time_to_live(config.cache.ttl)
                .build(),
            tasks: Arc::new(InMemoryTaskList::new()),
            assistant: Arc::new(PromptLog::new()),
            mailer: Arc::new(mailer),
            from_address: config.mailer.from_address.clone(),
        })
    }

    pub fn with_tasks(mut self, tasks: Arc<dyn TaskList>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn with_assistant(mut self, assistant: Arc<dyn Assistant>) -> Self {
        self.assistant = assistant;
        self
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn ReportMailer>) -> Self {
        self.mailer = mailer;
        self
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn tasks(&self) -> &Arc<dyn TaskList> {
        &self.tasks
    }

    /// The view for one role and window, served from cache when fresh.
    pub async fn view(&self, role: Role, window: Window) -> Result<Arc<DashboardView>, RuntimeError> {
        let key = (role, window);
        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!(role = %role, window = window.as_str(), "Dashboard cache hit");
            return Ok(hit);
        }

        let series = self.source.load().await?;
        let view = Arc::new(dashboard_view(role, &series, window, &self.policy));
        tracing::debug!(
            role = %role,
            window = window.as_str(),
            source = %self.source.describe(),
            insight = %view.selection.insight.id,
            "Dashboard view computed"
        );

        self.cache.insert(key, Arc::clone(&view)).await;
        Ok(view)
    }

    /// Views for every role, computed concurrently.
    pub async fn overview(&self, window: Window) -> Result<Vec<(Role, Arc<DashboardView>)>, RuntimeError> {
        let views = join_all(Role::ALL.iter().map(|role| self.view(*role, window))).await;

        Role::ALL
            .iter()
            .copied()
            .zip(views)
            .map(|(role, view)| view.map(|v| (role, v)))
            .collect()
    }

    /// Markdown report for a role, dated today.
    pub async fn report(&self, role: Role, window: Window) -> Result<String, RuntimeError> {
        let view = self.view(role, window).await?;
        Ok(build_report(
            role,
            &view.selection.insight,
            Some(&view.scorecard),
            Utc::now().date_naive(),
        ))
    }

    /// Turn the role's primary insight into a task.
    pub async fn add_insight_task(&self, role: Role, window: Window) -> Result<TaskId, RuntimeError> {
        let view = self.view(role, window).await?;
        let item = view.selection.insight.to_action_item(role);
        Ok(self.tasks.add(item).await?)
    }

    /// Hand the role's primary insight to the assistant. Returns the prompt sent.
    pub async fn ask_assistant(&self, role: Role, window: Window) -> Result<String, RuntimeError> {
        let view = self.view(role, window).await?;
        let prompt = insight_prompt(role, &view.selection.insight);
        self.assistant.submit(role, prompt.clone()).await?;
        Ok(prompt)
    }

    pub async fn email_report(
        &self,
        role: Role,
        window: Window,
        to: Vec<String>,
    ) -> Result<DeliveryReceipt, RuntimeError> {
        let body = self.report(role, window).await?;
        let subject = format!("{} ({})", report_title(role), window.title());
        let report = EmailReport::new(role, self.from_address.clone(), to, subject, body);

        let receipt = self.mailer.send(&report).await?;
        tracing::info!(
            role = %role,
            mailer = self.mailer.name(),
            message_id = %receipt.message_id,
            attempts = receipt.attempts,
            "Report emailed"
        );
        Ok(receipt)
    }

    /// Drop every cached view, e.g. after the source data changed.
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }
}

/// Shorthand for a service over the demo data with default settings.
pub fn demo_service() -> Result<DashboardService, RuntimeError> {
    DashboardService::new(Arc::new(FixtureSource), Policy::default(), &RuntimeConfig::default())
}

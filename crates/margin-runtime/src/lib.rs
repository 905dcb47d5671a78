//! # margin-runtime
//!
//! Async collaborators around the `margin-core` insight engine.
//!
//! `margin-core` decides what a role should see. This crate does the things
//! that happen afterwards and may touch the outside world:
//! - Caching dashboard views per role and window
//! - Turning an insight into a task
//! - Handing an insight to the assistant
//! - Mailing a report, with retry on transient failures
//!
//! ## Example
//!
//! ```rust,no_run
//! use margin_core::{Role, Window};
//! use margin_runtime::dashboard::demo_service;
//!
//! # async fn run() -> Result<(), margin_runtime::RuntimeError> {
//! let service = demo_service()?;
//! let view = service.view(Role::Owner, Window::Month).await?;
//! println!("{}", view.selection.insight.message);
//! # Ok(())
//! # }
//! ```

pub mod assistant;
pub mod config;
pub mod dashboard;
pub mod mailer;
pub mod prompts;
pub mod tasks;

pub use assistant::{Assistant, AssistantError, PromptLog, PromptRecord};
pub use config::{CacheConfig, ConfigError, MailerConfig, RetryConfig, RuntimeConfig};
pub use dashboard::{DashboardService, FileSource, FixtureSource, MetricSource};
pub use mailer::{
    DeliveryReceipt, EmailReport, FailureMode, MailError, RelayCredential, ReportMailer,
    RetryingMailer, SimulatedMailer,
};
pub use tasks::{InMemoryTaskList, Task, TaskError, TaskId, TaskList};

use margin_core::{PolicyError, SeriesError};
use thiserror::Error;

/// Errors from the runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Mail(#[from] MailError),

    #[error(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    Assistant(#[from] AssistantError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to load series: {0}")]
    Series(#[from] SeriesError),

    #[error("Failed to load policy: {0}")]
    Policy(#[from] PolicyError),
}

//! Assistant collaborator.
//!
//! The dashboard hands the assistant a free-text prompt and does not depend
//! on the reply. [`PromptLog`] records prompts in memory for the chat panel
//! to pick up.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use margin_core::Role;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AssistantError {
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("Assistant unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub role: Role,
    pub prompt: String,
    pub submitted_at: DateTime<Utc>,
}

#[async_trait]
pub trait Assistant: Send + Sync {
    async fn submit(&self, role: Role, prompt: String) -> Result<(), AssistantError>;
}

/// Keeps submitted prompts in order.
#[derive(Default)]
pub struct PromptLog {
    records: Mutex<Vec<PromptRecord>>,
}

impl PromptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<PromptRecord> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl Assistant for PromptLog {
    async fn submit(&self, role: Role, prompt: String) -> Result<(), AssistantError> {
        if prompt.trim().is_empty() {
            return Err(AssistantError::EmptyPrompt);
        }

        tracing::info!(role = %role, chars = prompt.len(), "Assistant prompt submitted");
        self.records.lock().push(PromptRecord {
            role,
            prompt,
            submitted_at: Utc::now(),
        });
        Ok(())
    }
}

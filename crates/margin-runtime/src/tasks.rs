//! Action/task list collaborator.
//!
//! Insights can be turned into tasks; the task list assigns ids and tracks
//! completion. The in-memory list is what the dashboard uses today.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use margin_core::ActionItem;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task title must not be empty")]
    EmptyTitle,

    #[error("Task {0} not found")]
    NotFound(TaskId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A stored task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,

    #[serde(flatten)]
    pub item: ActionItem,

    pub created_at: DateTime<Utc>,
    pub completed: bool,
}

#[async_trait]
pub trait TaskList: Send + Sync {
    /// Add an item and return its id.
    async fn add(&self, item: ActionItem) -> Result<TaskId, TaskError>;

    /// All tasks, oldest first.
    async fn list(&self) -> Vec<Task>;

    async fn complete(&self, id: TaskId) -> Result<(), TaskError>;
}

/// Task list held in process memory.
#[derive(Default)]
pub struct InMemoryTaskList {
    next_id: AtomicU64,
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryTaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.read().is_empty()
    }
}

#[async_trait]
impl TaskList for InMemoryTaskList {
    async fn add(&self, item: ActionItem) -> Result<TaskId, TaskError> {
        if item.title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }

        let id = TaskId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        tracing::info!(task = %id, title = %item.title, source = %item.source, "Task added");

        self.tasks.write().push(Task {
            id,
            item,
            created_at: Utc::now(),
            completed: false,
        });

        Ok(id)
    }

    async fn list(&self) -> Vec<Task> {
        self.tasks.read().clone()
    }

    async fn complete(&self, id: TaskId) -> Result<(), TaskError> {
        let mut tasks = self.tasks.write();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))?;
        task.completed = true;
        Ok(())
    }
}

//! In-memory ordered task collection.
//!
//! # Responsibility
//! - Own every task and keep insertion order as display order.
//! - Apply add/toggle/remove intents and answer filter queries.
//!
//! # Invariants
//! - Task ids are unique within the ledger.
//! - The ledger performs no I/O; callers persist after each mutation.

use crate::model::task::{Task, TaskId, TaskValidationError};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Ledger operation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    NotFound(TaskId),
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
        }
    }
}

impl Error for LedgerError {}

/// Visibility filter for task lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl FromStr for TaskFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(format!(
                "unsupported task filter `{other}`; expected all|active|completed"
            )),
        }
    }
}

/// Result of a successful toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggled {
    /// Task state after the flip.
    pub task: Task,
    /// `true` for incomplete -> complete, `false` for the reverse.
    pub was_completing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskLedger {
    tasks: Vec<Task>,
}

impl TaskLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from persisted tasks, dropping blank text and later
    /// duplicate ids.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut ledger = Self::new();
        for task in tasks {
            if task.text.trim().is_empty() {
                warn!(
                    "event=state_load module=ledger status=skipped reason=blank_text task_id={}",
                    task.id
                );
                continue;
            }
            if ledger.get(&task.id).is_none() {
                ledger.tasks.push(task);
            }
        }
        ledger
    }

    /// Appends a new incomplete task.
    ///
    /// # Errors
    /// - [`TaskValidationError::EmptyText`] for whitespace-only text; the
    ///   ledger is left unchanged.
    pub fn add(&mut self, text: impl Into<String>) -> Result<Task, TaskValidationError> {
        let mut task = Task::new(text)?;
        // v7 ids are unique in practice; regenerate on the off chance of reuse.
        while self.get(&task.id).is_some() {
            task = Task::new(task.text)?;
        }
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Flips completion of the task with `id`.
    pub fn toggle(&mut self, id: &str) -> Result<Toggled, LedgerError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
        let was_completing = task.toggle();
        Ok(Toggled {
            task: task.clone(),
            was_completing,
        })
    }

    /// Removes the task with `id`, returning it when present.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    pub fn filter(&self, filter: TaskFilter) -> Vec<&Task> {
        self.tasks.iter().filter(|task| filter.matches(task)).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    /// Number of tasks still to do.
    pub fn remaining_count(&self) -> usize {
        self.len() - self.completed_count()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

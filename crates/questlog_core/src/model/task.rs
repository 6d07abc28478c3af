//! Task domain model.
//!
//! # Responsibility
//! - Define the to-do record owned by the task ledger.
//! - Validate creation input before a task enters the ledger.
//!
//! # Invariants
//! - `id` is unique and never reused for another task.
//! - `text` is non-empty after trimming at creation time.
//! - `completed` only changes through [`Task::toggle`].

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque stable task identifier.
///
/// Generated as UUID v7 text, so ids are derived from creation time and sort
/// in creation order.
pub type TaskId = String;

/// Validation errors raised when constructing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Text is empty or whitespace-only.
    EmptyText,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// A single to-do item.
///
/// Wire names follow the stored `todos` payload (`value`, `isCompleted`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Text as entered by the user.
    #[serde(rename = "value")]
    pub text: String,
    #[serde(rename = "isCompleted")]
    pub completed: bool,
}

impl Task {
    /// Creates an incomplete task with a fresh time-derived id.
    ///
    /// # Errors
    /// - Returns [`TaskValidationError::EmptyText`] when `text` trims to empty.
    pub fn new(text: impl Into<String>) -> Result<Self, TaskValidationError> {
        Self::with_id(Uuid::now_v7().to_string(), text)
    }

    /// Creates an incomplete task with a caller-provided id.
    pub fn with_id(
        id: impl Into<TaskId>,
        text: impl Into<String>,
    ) -> Result<Self, TaskValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }

        Ok(Self {
            id: id.into(),
            text,
            completed: false,
        })
    }

    /// Flips completion and returns `true` when this was a completion.
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskValidationError};

    #[test]
    fn new_rejects_whitespace_only_text() {
        assert_eq!(
            Task::new("  \t ").unwrap_err(),
            TaskValidationError::EmptyText
        );
    }

    #[test]
    fn new_keeps_text_as_entered() {
        let task = Task::new("  water plants ").unwrap();
        assert_eq!(task.text, "  water plants ");
        assert!(!task.completed);
        assert!(!task.id.is_empty());
    }

    #[test]
    fn toggle_reports_direction() {
        let mut task = Task::with_id("t-1", "read").unwrap();
        assert!(task.toggle());
        assert!(!task.toggle());
    }
}

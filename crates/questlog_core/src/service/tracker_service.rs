//! Tracker use-case service.
//!
//! # Responsibility
//! - Apply user intents (add/toggle/delete) to the task ledger.
//! - Derive progression and achievement updates from completions.
//! - Persist every changed piece of state after each intent.
//!
//! # Invariants
//! - In-memory state is the source of truth; store failures never roll it
//!   back and are reported as a notice instead.
//! - A failed toggle leaves ledger, progression and achievements untouched.
//! - Task text is never written to logs.

use crate::clock::{Clock, SystemClock};
use crate::engine::achievements::{evaluate, EvaluationError};
use crate::engine::progression::{level_progress, on_completion, on_uncompletion};
use crate::ledger::{LedgerError, TaskFilter, TaskLedger};
use crate::model::achievement::Achievement;
use crate::model::progression::{LevelProgress, ProgressionState};
use crate::model::task::{Task, TaskId};
use crate::persistence::{self, load_state};
use crate::store::{KeyValueStore, StoreResult};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Recoverable failures surfaced to presentation callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    TaskNotFound(TaskId),
    Achievements(EvaluationError),
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Achievements(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TrackerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TaskNotFound(_) => None,
            Self::Achievements(err) => Some(err),
        }
    }
}

impl From<LedgerError> for TrackerError {
    fn from(value: LedgerError) -> Self {
        match value {
            LedgerError::NotFound(id) => Self::TaskNotFound(id),
        }
    }
}

impl From<EvaluationError> for TrackerError {
    fn from(value: EvaluationError) -> Self {
        Self::Achievements(value)
    }
}

/// Event for the presentation layer to react to (sound, animation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    TaskAdded { id: TaskId },
    TaskCompleted { id: TaskId },
    TaskUncompleted { id: TaskId },
    TaskDeleted { id: TaskId },
    LevelUp { level: u32 },
    AchievementUnlocked(Achievement),
}

/// Outcome of one intent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentReport {
    /// Events in the order they happened.
    pub events: Vec<CoreEvent>,
    /// User-visible message when part of the state could not be saved.
    pub notice: Option<String>,
}

/// Counts shown next to the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSummary {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub remaining_tasks: usize,
    pub unlocked_achievements: usize,
}

/// Full read model for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerSnapshot {
    pub tasks: Vec<Task>,
    pub progression: ProgressionState,
    pub level_progress: LevelProgress,
    pub achievements: Vec<Achievement>,
    pub summary: ProgressSummary,
    pub notice: Option<String>,
}

pub struct TrackerService<S: KeyValueStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    ledger: TaskLedger,
    progression: ProgressionState,
    achievements: Vec<Achievement>,
    notice: Option<String>,
}

impl<S: KeyValueStore, C: Clock> TrackerService<S, C> {
    /// Loads tracker state from `store`. Never fails.
    ///
    /// Keys that were absent or unreadable start from defaults; their
    /// warnings become the initial notice.
    pub fn load(store: S, clock: C) -> Self {
        let loaded = load_state(&store);
        let notice = if loaded.warnings.is_empty() {
            None
        } else {
            Some(loaded.warnings.join("; "))
        };

        info!(
            "event=tracker_load module=service status={} tasks={} points={} streak={}",
            if notice.is_some() { "degraded" } else { "ok" },
            loaded.tasks.len(),
            loaded.progression.points,
            loaded.progression.streak
        );

        Self {
            store,
            clock,
            ledger: TaskLedger::from_tasks(loaded.tasks),
            progression: loaded.progression,
            achievements: loaded.achievements,
            notice,
        }
    }

    /// Adds a task. Whitespace-only text is ignored without an event.
    pub fn add_task(&mut self, text: impl Into<String>) -> IntentReport {
        let task = match self.ledger.add(text) {
            Ok(task) => task,
            Err(err) => {
                debug!("event=task_add module=service status=ignored reason={err}");
                return IntentReport::default();
            }
        };

        info!("event=task_add module=service status=ok task_id={}", task.id);
        let mut failures = Vec::new();
        let result = persistence::save_tasks(&mut self.store, self.ledger.tasks());
        collect_failure(persistence::TASKS_KEY, result, &mut failures);

        self.finish(vec![CoreEvent::TaskAdded { id: task.id }], failures)
    }

    /// Flips completion of `id` and applies the gamification consequences.
    ///
    /// # Errors
    /// - [`TrackerError::TaskNotFound`] when no task has this id.
    /// - [`TrackerError::Achievements`] when the achievement set is foreign.
    pub fn toggle_task(&mut self, id: &str) -> Result<IntentReport, TrackerError> {
        let toggled = self.ledger.toggle(id).map_err(|err| {
            warn!("event=task_toggle module=service status=not_found task_id={id}");
            TrackerError::from(err)
        })?;

        let mut events = Vec::new();
        let mut achievements = None;

        let update = if toggled.was_completing {
            let today = self.clock.today();
            let update = on_completion(&self.progression, &today);
            let completed = u32::try_from(self.ledger.completed_count()).unwrap_or(u32::MAX);
            let evaluation = match evaluate(completed, update.state.streak, &self.achievements) {
                Ok(evaluation) => evaluation,
                Err(err) => {
                    self.ledger.toggle(id)?;
                    error!("event=task_toggle module=service status=error task_id={id} error={err}");
                    return Err(err.into());
                }
            };

            events.push(CoreEvent::TaskCompleted {
                id: toggled.task.id.clone(),
            });
            if let Some(level) = update.level_up {
                events.push(CoreEvent::LevelUp { level });
            }
            if let Some(unlocked) = evaluation.newly_unlocked {
                info!(
                    "event=achievement_unlock module=service status=ok achievement_id={}",
                    unlocked.id
                );
                events.push(CoreEvent::AchievementUnlocked(unlocked));
            }
            achievements = Some(evaluation.achievements);
            update
        } else {
            events.push(CoreEvent::TaskUncompleted {
                id: toggled.task.id.clone(),
            });
            on_uncompletion(&self.progression)
        };

        self.progression = update.state;
        info!(
            "event=task_toggle module=service status=ok task_id={} completing={} points={} level={} streak={}",
            toggled.task.id,
            toggled.was_completing,
            self.progression.points,
            self.progression.level,
            self.progression.streak
        );

        let mut failures = Vec::new();
        let result = persistence::save_tasks(&mut self.store, self.ledger.tasks());
        collect_failure(persistence::TASKS_KEY, result, &mut failures);
        let result = persistence::save_progression(&mut self.store, &self.progression);
        collect_failure("progress", result, &mut failures);
        if let Some(achievements) = achievements {
            self.achievements = achievements;
            let result = persistence::save_achievements(&mut self.store, &self.achievements);
            collect_failure(persistence::ACHIEVEMENTS_KEY, result, &mut failures);
        }

        Ok(self.finish(events, failures))
    }

    /// Deletes `id` if present. Unknown ids are a silent no-op.
    pub fn delete_task(&mut self, id: &str) -> IntentReport {
        let removed = self.ledger.remove(id);
        debug!(
            "event=task_delete module=service status={} task_id={id}",
            if removed.is_some() { "ok" } else { "absent" }
        );

        let mut failures = Vec::new();
        let result = persistence::save_tasks(&mut self.store, self.ledger.tasks());
        collect_failure(persistence::TASKS_KEY, result, &mut failures);

        let events = removed
            .map(|task| vec![CoreEvent::TaskDeleted { id: task.id }])
            .unwrap_or_default();
        self.finish(events, failures)
    }

    /// Returns tasks matching `filter` in ledger order.
    pub fn tasks(&self, filter: TaskFilter) -> Vec<Task> {
        self.ledger.filter(filter).into_iter().cloned().collect()
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        let completed_tasks = self.ledger.completed_count();
        TrackerSnapshot {
            tasks: self.ledger.tasks().to_vec(),
            progression: self.progression.clone(),
            level_progress: level_progress(self.progression.points),
            achievements: self.achievements.clone(),
            summary: ProgressSummary {
                total_tasks: self.ledger.len(),
                completed_tasks,
                remaining_tasks: self.ledger.remaining_count(),
                unlocked_achievements: self.achievements.iter().filter(|a| a.unlocked).count(),
            },
            notice: self.notice.clone(),
        }
    }

    pub fn progression(&self) -> &ProgressionState {
        &self.progression
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn ledger(&self) -> &TaskLedger {
        &self.ledger
    }

    /// Latest persistence notice, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn finish(&mut self, events: Vec<CoreEvent>, failures: Vec<String>) -> IntentReport {
        self.notice = if failures.is_empty() {
            None
        } else {
            Some(format!(
                "could not save {}; changes are kept for this session only",
                failures.join(", ")
            ))
        };
        IntentReport {
            events,
            notice: self.notice.clone(),
        }
    }
}

fn collect_failure(what: &str, result: StoreResult<()>, failures: &mut Vec<String>) {
    if let Err(err) = result {
        error!("event=state_save module=service status=error key={what} error={err}");
        failures.push(format!("{what} ({err})"));
    }
}

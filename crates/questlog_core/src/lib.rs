//! Core domain logic for QuestLog.
//! This crate is the single source of truth for task and gamification rules.

pub mod clock;
pub mod config;
pub mod db;
pub mod engine;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod service;
pub mod store;

pub use clock::{CalendarDay, Clock, FixedClock, SystemClock};
pub use config::CoreConfig;
pub use engine::achievements::{evaluate, Evaluation, EvaluationError};
pub use engine::progression::{level_progress, on_completion, on_uncompletion, ProgressionUpdate};
pub use ledger::{LedgerError, TaskFilter, TaskLedger, Toggled};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::achievement::{default_achievements, Achievement, AchievementRule};
pub use model::progression::{level_for_points, LevelProgress, ProgressionState};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use service::tracker_service::{
    CoreEvent, IntentReport, ProgressSummary, TrackerError, TrackerService, TrackerSnapshot,
};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

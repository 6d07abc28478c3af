//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose tracker intents (add/toggle/delete/list) to Dart via FRB.
//! - Translate core events and state into plain envelopes for rendering.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One process-wide tracker session serializes every call.
//! - When the store file cannot be opened the session runs in memory and
//!   says so through `notice`.

use log::warn;
use questlog_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Achievement, CoreConfig, CoreEvent, IntentReport, KeyValueStore, MemoryStore, SqliteStore,
    SystemClock, Task, TaskFilter, TrackerService,
};
use std::sync::{Mutex, OnceLock};

type SessionStore = Box<dyn KeyValueStore + Send>;

struct Session {
    tracker: TrackerService<SessionStore, SystemClock>,
    /// Set when the durable store could not be opened.
    degraded_notice: Option<String>,
}

impl Session {
    fn notice(&self) -> Option<String> {
        self.tracker
            .notice()
            .map(str::to_string)
            .or_else(|| self.degraded_notice.clone())
    }
}

static SESSION: OnceLock<Mutex<Session>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Task row for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerTaskItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

/// Achievement card for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerAchievementItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub unlocked: bool,
    pub progress: Option<u32>,
    pub target: Option<u32>,
}

/// One core event for the UI to react to (sound, confetti, toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerEventItem {
    /// `task_added|task_completed|task_uncompleted|task_deleted|level_up|achievement_unlocked`.
    pub kind: String,
    pub task_id: Option<String>,
    pub level: Option<u32>,
    pub achievement: Option<TrackerAchievementItem>,
}

/// Response envelope for intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerActionResponse {
    pub ok: bool,
    pub events: Vec<TrackerEventItem>,
    /// Transient persistence notice to show the user.
    pub notice: Option<String>,
    pub message: String,
}

impl TrackerActionResponse {
    fn from_report(message: impl Into<String>, report: IntentReport) -> Self {
        Self {
            ok: true,
            events: report.events.into_iter().map(to_event_item).collect(),
            notice: report.notice,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            events: Vec::new(),
            notice: None,
            message: message.into(),
        }
    }
}

/// Response envelope for filtered task lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerListResponse {
    pub ok: bool,
    pub items: Vec<TrackerTaskItem>,
    pub applied_filter: String,
    pub message: String,
}

/// Full render state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerSnapshotResponse {
    pub ok: bool,
    pub tasks: Vec<TrackerTaskItem>,
    pub achievements: Vec<TrackerAchievementItem>,
    pub points: u32,
    pub level: u32,
    pub streak: u32,
    pub points_into_level: u32,
    pub points_to_next_level: u32,
    pub remaining_tasks: u32,
    pub notice: Option<String>,
    pub message: String,
}

/// Returns the full tracker state for rendering.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_snapshot() -> TrackerSnapshotResponse {
    match with_session(|session| {
        let snapshot = session.tracker.snapshot();
        TrackerSnapshotResponse {
            ok: true,
            tasks: snapshot.tasks.into_iter().map(to_task_item).collect(),
            achievements: snapshot
                .achievements
                .into_iter()
                .map(to_achievement_item)
                .collect(),
            points: snapshot.progression.points,
            level: snapshot.progression.level,
            streak: snapshot.progression.streak,
            points_into_level: snapshot.level_progress.points_into_level,
            points_to_next_level: snapshot.level_progress.points_to_next_level,
            remaining_tasks: u32::try_from(snapshot.summary.remaining_tasks).unwrap_or(u32::MAX),
            notice: session.notice(),
            message: String::new(),
        }
    }) {
        Ok(response) => response,
        Err(err) => TrackerSnapshotResponse {
            ok: false,
            tasks: Vec::new(),
            achievements: Vec::new(),
            points: 0,
            level: 1,
            streak: 0,
            points_into_level: 0,
            points_to_next_level: 0,
            remaining_tasks: 0,
            notice: None,
            message: format!("tracker_snapshot failed: {err}"),
        },
    }
}

/// Adds a task. Whitespace-only text succeeds without events.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_add_task(text: String) -> TrackerActionResponse {
    with_session(|session| add_task_in(session, text)).unwrap_or_else(|err| {
        TrackerActionResponse::failure(format!("tracker_add_task failed: {err}"))
    })
}

/// Toggles completion. Unknown ids return `ok = false`.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_toggle_task(id: String) -> TrackerActionResponse {
    with_session(|session| toggle_task_in(session, &id)).unwrap_or_else(|err| {
        TrackerActionResponse::failure(format!("tracker_toggle_task failed: {err}"))
    })
}

/// Deletes a task. Unknown ids are a successful no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_delete_task(id: String) -> TrackerActionResponse {
    with_session(|session| delete_task_in(session, &id)).unwrap_or_else(|err| {
        TrackerActionResponse::failure(format!("tracker_delete_task failed: {err}"))
    })
}

/// Lists tasks using `all|active|completed`; empty input means `all`.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_list_tasks(filter: String) -> TrackerListResponse {
    let parsed = if filter.trim().is_empty() {
        Ok(TaskFilter::All)
    } else {
        filter.parse::<TaskFilter>()
    };
    let filter = match parsed {
        Ok(filter) => filter,
        Err(err) => {
            return TrackerListResponse {
                ok: false,
                items: Vec::new(),
                applied_filter: String::new(),
                message: format!("tracker_list_tasks failed: {err}"),
            };
        }
    };

    with_session(|session| list_tasks_in(session, filter)).unwrap_or_else(|err| {
        TrackerListResponse {
            ok: false,
            items: Vec::new(),
            applied_filter: filter.as_str().to_string(),
            message: format!("tracker_list_tasks failed: {err}"),
        }
    })
}

fn add_task_in(session: &mut Session, text: String) -> TrackerActionResponse {
    let report = session.tracker.add_task(text);
    if report.events.is_empty() {
        TrackerActionResponse::from_report("Nothing to add.", report)
    } else {
        TrackerActionResponse::from_report("Task added.", report)
    }
}

fn toggle_task_in(session: &mut Session, id: &str) -> TrackerActionResponse {
    match session.tracker.toggle_task(id.trim()) {
        Ok(report) => TrackerActionResponse::from_report("Task updated.", report),
        Err(err) => TrackerActionResponse::failure(format!("tracker_toggle_task failed: {err}")),
    }
}

fn delete_task_in(session: &mut Session, id: &str) -> TrackerActionResponse {
    let report = session.tracker.delete_task(id.trim());
    TrackerActionResponse::from_report("Task deleted.", report)
}

fn list_tasks_in(session: &Session, filter: TaskFilter) -> TrackerListResponse {
    let items = session
        .tracker
        .tasks(filter)
        .into_iter()
        .map(to_task_item)
        .collect::<Vec<_>>();
    let message = if items.is_empty() {
        "No tasks.".to_string()
    } else {
        format!("Found {} task(s).", items.len())
    };
    TrackerListResponse {
        ok: true,
        items,
        applied_filter: filter.as_str().to_string(),
        message,
    }
}

fn with_session<R>(f: impl FnOnce(&mut Session) -> R) -> Result<R, String> {
    let session = SESSION.get_or_init(|| Mutex::new(open_session(&CoreConfig::from_env())));
    let mut guard = session
        .lock()
        .map_err(|_| "tracker session is unavailable after an earlier failure".to_string())?;
    Ok(f(&mut guard))
}

fn open_session(config: &CoreConfig) -> Session {
    let (store, degraded_notice): (SessionStore, _) = match SqliteStore::open(&config.db_path) {
        Ok(store) => (Box::new(store) as SessionStore, None),
        Err(err) => {
            warn!(
                "event=session_open module=ffi status=degraded db_path={} error={}",
                config.db_path.display(),
                err
            );
            (
                Box::new(MemoryStore::new()) as SessionStore,
                Some(format!(
                    "could not open saved data ({err}); changes are kept for this session only"
                )),
            )
        }
    };

    Session {
        tracker: TrackerService::load(store, SystemClock),
        degraded_notice,
    }
}

fn to_task_item(task: Task) -> TrackerTaskItem {
    TrackerTaskItem {
        id: task.id,
        text: task.text,
        completed: task.completed,
    }
}

fn to_achievement_item(achievement: Achievement) -> TrackerAchievementItem {
    TrackerAchievementItem {
        id: achievement.id,
        title: achievement.title,
        description: achievement.description,
        icon: achievement.icon,
        unlocked: achievement.unlocked,
        progress: achievement.progress,
        target: achievement.target,
    }
}

fn to_event_item(event: CoreEvent) -> TrackerEventItem {
    let (kind, task_id, level, achievement) = match event {
        CoreEvent::TaskAdded { id } => ("task_added", Some(id), None, None),
        CoreEvent::TaskCompleted { id } => ("task_completed", Some(id), None, None),
        CoreEvent::TaskUncompleted { id } => ("task_uncompleted", Some(id), None, None),
        CoreEvent::TaskDeleted { id } => ("task_deleted", Some(id), None, None),
        CoreEvent::LevelUp { level } => ("level_up", None, Some(level), None),
        CoreEvent::AchievementUnlocked(achievement) => (
            "achievement_unlocked",
            None,
            None,
            Some(to_achievement_item(achievement)),
        ),
    };
    TrackerEventItem {
        kind: kind.to_string(),
        task_id,
        level,
        achievement,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        add_task_in, core_version, delete_task_in, init_logging, list_tasks_in, open_session, ping,
        toggle_task_in, tracker_add_task, tracker_list_tasks, tracker_snapshot,
    };
    use questlog_core::{CoreConfig, TaskFilter};
    use std::path::Path;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn add_toggle_list_and_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(dir.path());
        let mut session = open_session(&config);
        assert!(session.notice().is_none());

        let added = add_task_in(&mut session, "ffi task".to_string());
        assert!(added.ok, "{}", added.message);
        assert_eq!(added.events[0].kind, "task_added");
        let id = added.events[0].task_id.clone().expect("task id");

        let toggled = toggle_task_in(&mut session, &id);
        assert!(toggled.ok, "{}", toggled.message);
        assert_eq!(toggled.events[0].kind, "task_completed");

        let completed = list_tasks_in(&session, TaskFilter::Completed);
        assert_eq!(completed.applied_filter, "completed");
        assert!(completed
            .items
            .iter()
            .any(|item| item.id == id && item.text == "ffi task"));

        let deleted = delete_task_in(&mut session, &id);
        assert_eq!(deleted.events[0].kind, "task_deleted");
        let all = list_tasks_in(&session, TaskFilter::All);
        assert!(all.items.is_empty());
        assert!(config.db_path.exists());
    }

    #[test]
    fn whitespace_add_reports_nothing_to_add() {
        let response = tracker_add_task("   ".to_string());
        assert!(response.ok);
        assert!(response.events.is_empty());
    }

    #[test]
    fn whitespace_add_in_session_keeps_ledger_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = open_session(&temp_config(dir.path()));
        let response = add_task_in(&mut session, "   ".to_string());
        assert!(response.ok);
        assert!(response.events.is_empty());
        assert!(list_tasks_in(&session, TaskFilter::All).items.is_empty());
    }

    #[test]
    fn toggle_unknown_task_fails_softly() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = open_session(&temp_config(dir.path()));
        let response = toggle_task_in(&mut session, "  missing-id  ");
        assert!(!response.ok);
        assert!(response.message.contains("task not found"));
    }

    #[test]
    fn list_rejects_unknown_filter() {
        let response = tracker_list_tasks("someday".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("all|active|completed"));
    }

    #[test]
    fn snapshot_level_matches_points() {
        let snapshot = tracker_snapshot();
        assert!(snapshot.ok, "{}", snapshot.message);
        assert_eq!(snapshot.level, snapshot.points / 100 + 1);
        assert_eq!(snapshot.achievements.len(), 4);
    }

    #[test]
    fn unopenable_store_degrades_to_memory_with_notice() {
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let config = CoreConfig {
            db_path: blocker.path().join("nested.sqlite3"),
            ..CoreConfig::default()
        };

        let mut session = open_session(&config);
        assert!(session.notice().unwrap().contains("this session only"));
        session.tracker.add_task("offline task");
        assert_eq!(session.tracker.tasks(TaskFilter::All).len(), 1);
    }

    fn temp_config(dir: &Path) -> CoreConfig {
        CoreConfig {
            db_path: dir.join("questlog.sqlite3"),
            ..CoreConfig::default()
        }
    }
}

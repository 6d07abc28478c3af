//! Mapping between in-memory tracker state and store keys.
//!
//! # Responsibility
//! - Decode each stored key, falling back to defaults when absent or bad.
//! - Encode ledger, progression and achievements back to their keys.
//!
//! # Invariants
//! - Load never fails; every fallback is logged and reported as a warning.
//! - Each key is written independently of the others.
//! - Stored `level` is never trusted; it is recomputed from `points`.

use crate::clock::CalendarDay;
use crate::engine::achievements::validate_set;
use crate::model::achievement::{default_achievements, Achievement};
use crate::model::progression::ProgressionState;
use crate::model::task::Task;
use crate::store::{KeyValueStore, StoreError, StoreResult};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::str::FromStr;

pub const TASKS_KEY: &str = "todos";
pub const POINTS_KEY: &str = "points";
pub const LEVEL_KEY: &str = "level";
pub const STREAK_KEY: &str = "streak";
pub const LAST_COMPLETION_DAY_KEY: &str = "lastCompletionDate";
pub const ACHIEVEMENTS_KEY: &str = "achievements";

/// State recovered from a store at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedState {
    pub tasks: Vec<Task>,
    pub progression: ProgressionState,
    pub achievements: Vec<Achievement>,
    /// One message per key that fell back to its default.
    pub warnings: Vec<String>,
}

/// Reads every key, substituting defaults for absent or unparsable values.
pub fn load_state(store: &dyn KeyValueStore) -> LoadedState {
    let mut warnings = Vec::new();

    let tasks = read_json::<Vec<Task>>(store, TASKS_KEY, &mut warnings).unwrap_or_default();
    let points = read_number(store, POINTS_KEY, &mut warnings).unwrap_or(0);
    let streak = read_number(store, STREAK_KEY, &mut warnings).unwrap_or(0);
    let last_completion_day = read_raw(store, LAST_COMPLETION_DAY_KEY, &mut warnings)
        .and_then(|value| CalendarDay::from_stored(&value));

    let achievements = match read_json::<Vec<Achievement>>(store, ACHIEVEMENTS_KEY, &mut warnings)
    {
        Some(set) => match validate_set(&set) {
            Ok(()) => set,
            Err(err) => {
                record_fallback(ACHIEVEMENTS_KEY, &err.to_string(), &mut warnings);
                default_achievements()
            }
        },
        None => default_achievements(),
    };

    LoadedState {
        tasks,
        progression: ProgressionState::new(points, streak, last_completion_day),
        achievements,
        warnings,
    }
}

pub fn save_tasks(store: &mut dyn KeyValueStore, tasks: &[Task]) -> StoreResult<()> {
    write_json(store, TASKS_KEY, &tasks)
}

/// Writes all four progression keys, stopping at the first failure.
pub fn save_progression(
    store: &mut dyn KeyValueStore,
    state: &ProgressionState,
) -> StoreResult<()> {
    store.save(POINTS_KEY, &state.points.to_string())?;
    store.save(LEVEL_KEY, &state.level.to_string())?;
    store.save(STREAK_KEY, &state.streak.to_string())?;
    let day = state
        .last_completion_day
        .as_ref()
        .map(CalendarDay::as_str)
        .unwrap_or_default();
    store.save(LAST_COMPLETION_DAY_KEY, day)
}

pub fn save_achievements(
    store: &mut dyn KeyValueStore,
    achievements: &[Achievement],
) -> StoreResult<()> {
    write_json(store, ACHIEVEMENTS_KEY, &achievements)
}

fn write_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let encoded = serde_json::to_string(value)
        .map_err(|err| StoreError::Unavailable(format!("failed to encode `{key}`: {err}")))?;
    store.save(key, &encoded)
}

fn read_raw(store: &dyn KeyValueStore, key: &str, warnings: &mut Vec<String>) -> Option<String> {
    match store.load(key) {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            debug!("event=state_load module=persistence status=absent key={key}");
            None
        }
        Err(err) => {
            record_fallback(key, &err.to_string(), warnings);
            None
        }
    }
}

fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    warnings: &mut Vec<String>,
) -> Option<T> {
    let raw = read_raw(store, key, warnings)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            record_fallback(key, &err.to_string(), warnings);
            None
        }
    }
}

fn read_number<T: FromStr>(
    store: &dyn KeyValueStore,
    key: &str,
    warnings: &mut Vec<String>,
) -> Option<T> {
    let raw = read_raw(store, key, warnings)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            record_fallback(key, "not a non-negative integer", warnings);
            None
        }
    }
}

fn record_fallback(key: &str, reason: &str, warnings: &mut Vec<String>) {
    warn!("event=state_load module=persistence status=fallback key={key} reason={reason}");
    warnings.push(format!("stored `{key}` could not be read; using default ({reason})"));
}

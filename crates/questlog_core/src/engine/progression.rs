//! Points, level and streak transitions.
//!
//! # Invariants
//! - Level is recomputed from points on every transition.
//! - Streak grows at most once per calendar day and never shrinks.

use crate::clock::CalendarDay;
use crate::model::progression::{
    level_for_points, LevelProgress, ProgressionState, POINTS_PER_COMPLETION, POINTS_PER_LEVEL,
};

/// Result of one progression transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionUpdate {
    pub state: ProgressionState,
    /// New level when this transition raised it.
    pub level_up: Option<u32>,
}

/// Applies a task completion observed on `today`.
pub fn on_completion(state: &ProgressionState, today: &CalendarDay) -> ProgressionUpdate {
    let points = state.points.saturating_add(POINTS_PER_COMPLETION);
    let level = level_for_points(points);
    let level_up = (level > state.level).then_some(level);

    let (streak, last_completion_day) = if state.last_completion_day.as_ref() == Some(today) {
        (state.streak, state.last_completion_day.clone())
    } else {
        (state.streak.saturating_add(1), Some(today.clone()))
    };

    ProgressionUpdate {
        state: ProgressionState {
            points,
            level,
            streak,
            last_completion_day,
        },
        level_up,
    }
}

/// Reverts the points of one completion. Streak and day marker stay put.
pub fn on_uncompletion(state: &ProgressionState) -> ProgressionUpdate {
    let points = state.points.saturating_sub(POINTS_PER_COMPLETION);
    ProgressionUpdate {
        state: ProgressionState {
            points,
            level: level_for_points(points),
            streak: state.streak,
            last_completion_day: state.last_completion_day.clone(),
        },
        level_up: None,
    }
}

pub fn level_progress(points: u32) -> LevelProgress {
    let points_into_level = points % POINTS_PER_LEVEL;
    LevelProgress {
        level: level_for_points(points),
        points_into_level,
        points_per_level: POINTS_PER_LEVEL,
        points_to_next_level: POINTS_PER_LEVEL - points_into_level,
    }
}

#[cfg(test)]
mod tests {
    use super::{level_progress, on_completion};
    use crate::clock::CalendarDay;
    use crate::model::progression::ProgressionState;

    #[test]
    fn crossing_a_hundred_points_levels_up() {
        let state = ProgressionState::new(95, 4, None);
        let today = CalendarDay::from_stored("2026-05-01").unwrap();
        let update = on_completion(&state, &today);
        assert_eq!(update.state.points, 105);
        assert_eq!(update.state.level, 2);
        assert_eq!(update.level_up, Some(2));
    }

    #[test]
    fn level_progress_splits_points() {
        let progress = level_progress(230);
        assert_eq!(progress.level, 3);
        assert_eq!(progress.points_into_level, 30);
        assert_eq!(progress.points_to_next_level, 70);
    }
}

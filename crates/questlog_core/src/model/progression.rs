//! Progression state: points, level and daily streak.
//!
//! # Invariants
//! - `level == level_for_points(points)` after every transition.
//! - `streak` only grows; it is never decremented by uncompletions.

use crate::clock::CalendarDay;

/// Points awarded (and revoked) per completion.
pub const POINTS_PER_COMPLETION: u32 = 10;
/// Points needed to advance one level.
pub const POINTS_PER_LEVEL: u32 = 100;

/// Returns the level implied by a points total.
pub fn level_for_points(points: u32) -> u32 {
    points / POINTS_PER_LEVEL + 1
}

/// Snapshot of the user's gamification counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionState {
    pub points: u32,
    pub level: u32,
    /// Number of distinct days with at least one completion.
    pub streak: u32,
    /// Day of the most recent streak increment.
    pub last_completion_day: Option<CalendarDay>,
}

impl ProgressionState {
    /// Builds a state whose level is recomputed from `points`.
    pub fn new(points: u32, streak: u32, last_completion_day: Option<CalendarDay>) -> Self {
        Self {
            points,
            level: level_for_points(points),
            streak,
            last_completion_day,
        }
    }
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new(0, 0, None)
    }
}

/// Position inside the current level, for progress bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: u32,
    pub points_into_level: u32,
    pub points_per_level: u32,
    pub points_to_next_level: u32,
}

#[cfg(test)]
mod tests {
    use super::{level_for_points, ProgressionState};

    #[test]
    fn level_boundaries() {
        assert_eq!(level_for_points(0), 1);
        assert_eq!(level_for_points(99), 1);
        assert_eq!(level_for_points(100), 2);
        assert_eq!(level_for_points(250), 3);
    }

    #[test]
    fn default_state_is_level_one() {
        let state = ProgressionState::default();
        assert_eq!(state.level, 1);
        assert_eq!(state.streak, 0);
        assert!(state.last_completion_day.is_none());
    }
}

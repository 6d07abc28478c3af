//! Achievement evaluation over a completed-count / streak snapshot.
//!
//! # Responsibility
//! - Update progress and unlock flags for every built-in definition.
//! - Report at most one newly unlocked achievement per pass.
//!
//! # Invariants
//! - Rules run in definition order against the input snapshot.
//! - When several rules unlock in one pass, the last one is reported.
//! - Unlocked achievements are never modified again.

use crate::model::achievement::{
    find_definition, Achievement, AchievementRule, ACHIEVEMENT_DEFINITIONS,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// An id is missing or repeated, or the set holds an id with no definition.
    NotFound(String),
}

impl Display for EvaluationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "achievement not found: {id}"),
        }
    }
}

impl Error for EvaluationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Updated set, same order as the input.
    pub achievements: Vec<Achievement>,
    pub newly_unlocked: Option<Achievement>,
}

/// Checks that `achievements` covers exactly the built-in definitions.
pub fn validate_set(achievements: &[Achievement]) -> Result<(), EvaluationError> {
    if let Some(foreign) = achievements
        .iter()
        .find(|achievement| find_definition(&achievement.id).is_none())
    {
        return Err(EvaluationError::NotFound(foreign.id.clone()));
    }
    if let Some((_, repeated)) = achievements.iter().enumerate().find(|(index, achievement)| {
        achievements[..*index]
            .iter()
            .any(|earlier| earlier.id == achievement.id)
    }) {
        return Err(EvaluationError::NotFound(repeated.id.clone()));
    }
    if let Some(missing) = ACHIEVEMENT_DEFINITIONS
        .iter()
        .find(|def| !achievements.iter().any(|a| a.id == def.id))
    {
        return Err(EvaluationError::NotFound(missing.id.to_string()));
    }
    Ok(())
}

/// Evaluates every definition against `completed_count` and `current_streak`.
pub fn evaluate(
    completed_count: u32,
    current_streak: u32,
    achievements: &[Achievement],
) -> Result<Evaluation, EvaluationError> {
    validate_set(achievements)?;

    let mut updated = achievements.to_vec();
    let mut newly_unlocked = None;

    for def in ACHIEVEMENT_DEFINITIONS {
        let Some(achievement) = updated.iter_mut().find(|a| a.id == def.id) else {
            return Err(EvaluationError::NotFound(def.id.to_string()));
        };
        if achievement.unlocked {
            continue;
        }

        let unlocked_now = match def.rule {
            AchievementRule::FirstCompletion => apply_binary(achievement, completed_count == 1),
            AchievementRule::CompletedCount { target } => {
                apply_progress(achievement, completed_count.min(target), target)
            }
            AchievementRule::Streak { target } => {
                apply_progress(achievement, current_streak, target)
            }
        };
        if unlocked_now {
            newly_unlocked = Some(achievement.clone());
        }
    }

    Ok(Evaluation {
        achievements: updated,
        newly_unlocked,
    })
}

fn apply_binary(achievement: &mut Achievement, condition: bool) -> bool {
    if condition {
        achievement.unlocked = true;
    }
    condition
}

// Unlock uses equality with the target, not `>=`.
fn apply_progress(achievement: &mut Achievement, progress: u32, target: u32) -> bool {
    achievement.progress = Some(progress);
    let reached = progress == target;
    if reached {
        achievement.unlocked = true;
    }
    reached
}

#[cfg(test)]
mod tests {
    use super::{evaluate, validate_set, EvaluationError};
    use crate::model::achievement::default_achievements;

    #[test]
    fn zero_snapshot_changes_nothing_but_progress() {
        let evaluation = evaluate(0, 0, &default_achievements()).unwrap();
        assert!(evaluation.newly_unlocked.is_none());
        assert_eq!(evaluation.achievements, default_achievements());
    }

    #[test]
    fn foreign_id_is_rejected() {
        let mut set = default_achievements();
        set[2].id = "speed-run".to_string();
        assert_eq!(
            validate_set(&set).unwrap_err(),
            EvaluationError::NotFound("speed-run".to_string())
        );
    }

    #[test]
    fn repeated_id_is_rejected() {
        let mut set = default_achievements();
        set.push(set[1].clone());
        assert_eq!(
            validate_set(&set).unwrap_err(),
            EvaluationError::NotFound(set[1].id.clone())
        );
    }
}

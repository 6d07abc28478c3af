//! Achievement model and the fixed set of milestone definitions.
//!
//! # Responsibility
//! - Describe the four built-in milestones as static data.
//! - Provide the persisted achievement record shape.
//!
//! # Invariants
//! - Definition ids are unique and their order is the evaluation order.
//! - Binary achievements carry no `progress`/`target` fields.

use serde::{Deserialize, Serialize};

pub const FIRST_TODO_ID: &str = "first-todo";
pub const FIVE_TODOS_ID: &str = "five-todos";
pub const TEN_TODOS_ID: &str = "ten-todos";
pub const STREAK_THREE_ID: &str = "streak-three";

/// Unlock condition attached to a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementRule {
    /// Unlocks when exactly one task is completed. No progress tracking.
    FirstCompletion,
    /// Tracks completed task count up to `target`.
    CompletedCount { target: u32 },
    /// Tracks the daily streak and unlocks on `streak == target`.
    Streak { target: u32 },
}

impl AchievementRule {
    pub fn target(self) -> Option<u32> {
        match self {
            Self::FirstCompletion => None,
            Self::CompletedCount { target } | Self::Streak { target } => Some(target),
        }
    }
}

/// Static description of one milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rule: AchievementRule,
}

impl AchievementDefinition {
    /// Returns the locked, zero-progress record for this definition.
    pub fn initial(&self) -> Achievement {
        let target = self.rule.target();
        Achievement {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            unlocked: false,
            progress: target.map(|_| 0),
            target,
        }
    }
}

/// Built-in milestones in evaluation order.
pub const ACHIEVEMENT_DEFINITIONS: &[AchievementDefinition] = &[
    AchievementDefinition {
        id: FIRST_TODO_ID,
        title: "First Step",
        description: "Complete your first todo",
        icon: "🏆",
        rule: AchievementRule::FirstCompletion,
    },
    AchievementDefinition {
        id: FIVE_TODOS_ID,
        title: "Getting Things Done",
        description: "Complete 5 todos",
        icon: "⭐",
        rule: AchievementRule::CompletedCount { target: 5 },
    },
    AchievementDefinition {
        id: TEN_TODOS_ID,
        title: "Productivity Master",
        description: "Complete 10 todos",
        icon: "🌟",
        rule: AchievementRule::CompletedCount { target: 10 },
    },
    AchievementDefinition {
        id: STREAK_THREE_ID,
        title: "On a Roll",
        description: "Complete 3 todos in a row",
        icon: "🔥",
        rule: AchievementRule::Streak { target: 3 },
    },
];

/// Looks up a definition by id.
pub fn find_definition(id: &str) -> Option<&'static AchievementDefinition> {
    ACHIEVEMENT_DEFINITIONS.iter().find(|def| def.id == id)
}

/// Returns the locked default set in definition order.
pub fn default_achievements() -> Vec<Achievement> {
    ACHIEVEMENT_DEFINITIONS
        .iter()
        .map(AchievementDefinition::initial)
        .collect()
}

/// Persisted achievement state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::{default_achievements, find_definition, FIRST_TODO_ID, STREAK_THREE_ID};

    #[test]
    fn defaults_are_locked_with_zero_progress() {
        let set = default_achievements();
        assert_eq!(set.len(), 4);
        assert!(set.iter().all(|a| !a.unlocked));
        assert_eq!(set[0].id, FIRST_TODO_ID);
        assert_eq!(set[0].progress, None);
        assert_eq!(set[0].target, None);
        assert_eq!(set[3].progress, Some(0));
        assert_eq!(set[3].target, Some(3));
    }

    #[test]
    fn definitions_are_found_by_id() {
        assert!(find_definition(STREAK_THREE_ID).is_some());
        assert!(find_definition("speed-run").is_none());
    }
}

//! Badge catalog and evaluation.
//!
//! `evaluate` is pure: it looks at the progress as it was before a completion
//! plus the XP and task set the completion would produce, and returns the
//! badges that become newly earned. Persisting them is the caller's job.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::progress::{BadgeType, EarnedBadge, UserProgress};
use crate::progress::leveling::level_for_xp;

/// Threshold a badge is judged against. The variant fixes the badge type.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BadgeRule {
    /// Number of completed tasks.
    Milestone { tasks: usize },
    /// Completed tasks within one category.
    Category {
        category: &'static str,
        tasks: usize,
    },
    /// Level implied by the new XP total.
    Level { level: u32 },
    Xp { xp: u32 },
    /// Streak length before the completion is counted.
    Streak { days: u32 },
}

impl BadgeRule {
    pub fn badge_type(&self) -> BadgeType {
        match self {
            BadgeRule::Milestone { .. } => BadgeType::Milestone,
            BadgeRule::Category { .. } => BadgeType::Category,
            BadgeRule::Level { .. } => BadgeType::Level,
            BadgeRule::Xp { .. } => BadgeType::Xp,
            BadgeRule::Streak { .. } => BadgeType::Streak,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BadgeDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rule: BadgeRule,
}

impl BadgeDefinition {
    fn earn(&self, earned_at: DateTime<Utc>) -> EarnedBadge {
        EarnedBadge {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            badge_type: self.rule.badge_type(),
            earned_at,
        }
    }
}

pub const BADGE_CATALOG: &[BadgeDefinition] = &[
    BadgeDefinition {
        id: "first-task",
        name: "First Step",
        description: "Complete your first task",
        icon: "🌱",
        rule: BadgeRule::Milestone { tasks: 1 },
    },
    BadgeDefinition {
        id: "task-explorer",
        name: "Explorer",
        description: "Complete 5 tasks",
        icon: "🧭",
        rule: BadgeRule::Milestone { tasks: 5 },
    },
    BadgeDefinition {
        id: "task-master",
        name: "Task Master",
        description: "Complete 10 tasks",
        icon: "🏆",
        rule: BadgeRule::Milestone { tasks: 10 },
    },
    BadgeDefinition {
        id: "level-up",
        name: "Level Up",
        description: "Reach level 2",
        icon: "⭐",
        rule: BadgeRule::Level { level: 2 },
    },
    BadgeDefinition {
        id: "xp-collector",
        name: "XP Collector",
        description: "Earn 200 XP",
        icon: "💎",
        rule: BadgeRule::Xp { xp: 200 },
    },
    BadgeDefinition {
        id: "xp-champion",
        name: "XP Champion",
        description: "Earn 1000 XP",
        icon: "👑",
        rule: BadgeRule::Xp { xp: 1000 },
    },
    BadgeDefinition {
        id: "streak-3",
        name: "On a Roll",
        description: "Keep a 3-day streak",
        icon: "🔥",
        rule: BadgeRule::Streak { days: 3 },
    },
    BadgeDefinition {
        id: "streak-7",
        name: "Week Warrior",
        description: "Keep a 7-day streak",
        icon: "📅",
        rule: BadgeRule::Streak { days: 7 },
    },
    BadgeDefinition {
        id: "self-care-star",
        name: "Self-Care Star",
        description: "Complete 5 self-care tasks",
        icon: "💖",
        rule: BadgeRule::Category {
            category: "self-care",
            tasks: 5,
        },
    },
];

/// Returns badges from `BADGE_CATALOG` that `current` does not hold yet and
/// that the post-completion state qualifies for, stamped with `earned_at`.
///
/// Category badges never fire: per-task categories are not tracked in
/// progress, so there is nothing to count them against.
pub fn evaluate(
    current: &UserProgress,
    new_xp: u32,
    new_completed_tasks: &BTreeSet<String>,
    earned_at: DateTime<Utc>,
) -> Vec<EarnedBadge> {
    BADGE_CATALOG
        .iter()
        .filter(|def| !current.has_badge(def.id))
        .filter(|def| match def.rule {
            BadgeRule::Xp { xp } => new_xp >= xp,
            BadgeRule::Milestone { tasks } => new_completed_tasks.len() >= tasks,
            BadgeRule::Level { level } => level_for_xp(new_xp) >= level,
            BadgeRule::Category { .. } => false,
            BadgeRule::Streak { days } => current.streak_days >= days,
        })
        .map(|def| def.earn(earned_at))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks(n: usize) -> BTreeSet<String> {
        (0..n).map(|i| format!("task-{i}")).collect()
    }

    fn ids(badges: &[EarnedBadge]) -> Vec<&str> {
        badges.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_catalog_ids_unique() {
        let unique: BTreeSet<_> = BADGE_CATALOG.iter().map(|b| b.id).collect();
        assert_eq!(unique.len(), BADGE_CATALOG.len());
    }

    #[test]
    fn test_first_completion_earns_first_task_only() {
        let p = UserProgress::new("u");
        let earned = evaluate(&p, 50, &tasks(1), Utc::now());
        assert_eq!(ids(&earned), vec!["first-task"]);
    }

    #[test]
    fn test_level_badge_needs_level_two() {
        let p = UserProgress::new("u");
        assert!(!ids(&evaluate(&p, 99, &tasks(1), Utc::now())).contains(&"level-up"));
        assert!(ids(&evaluate(&p, 100, &tasks(1), Utc::now())).contains(&"level-up"));
    }

    #[test]
    fn test_xp_threshold_inclusive() {
        let p = UserProgress::new("u");
        let earned = evaluate(&p, 200, &tasks(2), Utc::now());
        assert!(ids(&earned).contains(&"xp-collector"));
        assert!(!ids(&earned).contains(&"xp-champion"));
    }

    #[test]
    fn test_already_held_badges_skipped() {
        let mut p = UserProgress::new("u");
        p.badges = evaluate(&p, 0, &tasks(1), Utc::now());
        let earned = evaluate(&p, 10, &tasks(2), Utc::now());
        assert!(earned.is_empty());
    }

    #[test]
    fn test_streak_uses_pre_completion_streak() {
        let mut p = UserProgress::new("u");
        p.streak_days = 2;
        assert!(!ids(&evaluate(&p, 0, &tasks(0), Utc::now())).contains(&"streak-3"));
        p.streak_days = 3;
        assert_eq!(ids(&evaluate(&p, 0, &tasks(0), Utc::now())), vec!["streak-3"]);
    }

    #[test]
    fn test_category_badge_never_fires() {
        let p = UserProgress::new("u");
        let earned = evaluate(&p, 5000, &tasks(100), Utc::now());
        assert!(!ids(&earned).contains(&"self-care-star"));
    }

    #[test]
    fn test_evaluate_stamps_type_and_time() {
        let p = UserProgress::new("u");
        let at = Utc::now();
        let earned = evaluate(&p, 0, &tasks(1), at);
        assert_eq!(earned[0].badge_type, BadgeType::Milestone);
        assert_eq!(earned[0].earned_at, at);
    }
}

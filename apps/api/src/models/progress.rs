use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BadgeType {
    Milestone,
    Category,
    Level,
    Xp,
    Streak,
}

/// A badge instance attached to a user's progress. Permanent once earned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EarnedBadge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub badge_type: BadgeType,
    pub earned_at: DateTime<Utc>,
}

/// Accumulated progression state for one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProgress {
    pub user_id: String,
    pub xp: u32,
    pub level: u32,
    pub completed_tasks: BTreeSet<String>,
    pub badges: Vec<EarnedBadge>,
    pub streak_days: u32,
    pub last_active_date: Option<NaiveDate>,
    /// Bumped on every successful update; used for compare-and-swap writes.
    pub revision: u64,
}

impl UserProgress {
    /// The zero state every new user starts from.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            xp: 0,
            level: 1,
            completed_tasks: BTreeSet::new(),
            badges: Vec::new(),
            streak_days: 0,
            last_active_date: None,
            revision: 0,
        }
    }

    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.badges.iter().any(|b| b.id == badge_id)
    }

    /// Merges a partial update in place and bumps the revision.
    /// No cross-field validation happens here; callers supply consistent values.
    pub fn apply(&mut self, update: ProgressUpdate) {
        let ProgressUpdate {
            xp,
            level,
            completed_tasks,
            badges,
            streak_days,
            last_active_date,
            expected_revision: _,
        } = update;

        if let Some(xp) = xp {
            self.xp = xp;
        }
        if let Some(level) = level {
            self.level = level;
        }
        if let Some(completed_tasks) = completed_tasks {
            self.completed_tasks = completed_tasks;
        }
        if let Some(badges) = badges {
            self.badges = badges;
        }
        if let Some(streak_days) = streak_days {
            self.streak_days = streak_days;
        }
        if let Some(date) = last_active_date {
            self.last_active_date = Some(date);
        }
        self.revision += 1;
    }
}

/// Partial write against a stored `UserProgress`. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub xp: Option<u32>,
    pub level: Option<u32>,
    pub completed_tasks: Option<BTreeSet<String>>,
    pub badges: Option<Vec<EarnedBadge>>,
    pub streak_days: Option<u32>,
    pub last_active_date: Option<NaiveDate>,
    /// When set, the write only succeeds if the stored revision still matches.
    pub expected_revision: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_progress_is_zero_state() {
        let p = UserProgress::new("user_1");
        assert_eq!(p.xp, 0);
        assert_eq!(p.level, 1);
        assert!(p.completed_tasks.is_empty());
        assert!(p.badges.is_empty());
        assert_eq!(p.streak_days, 0);
        assert_eq!(p.last_active_date, None);
    }

    #[test]
    fn test_apply_merges_only_supplied_fields() {
        let mut p = UserProgress::new("user_1");
        p.streak_days = 4;
        p.apply(ProgressUpdate {
            xp: Some(120),
            level: Some(2),
            ..Default::default()
        });
        assert_eq!(p.xp, 120);
        assert_eq!(p.level, 2);
        assert_eq!(p.streak_days, 4);
        assert_eq!(p.revision, 1);
    }

    #[test]
    fn test_badge_type_serializes_under_type_key() {
        let badge = EarnedBadge {
            id: "first-task".into(),
            name: "First Step".into(),
            description: "Complete your first task".into(),
            icon: "🌱".into(),
            badge_type: BadgeType::Milestone,
            earned_at: Utc::now(),
        };
        let v = serde_json::to_value(&badge).unwrap();
        assert_eq!(v["type"], "milestone");
    }
}

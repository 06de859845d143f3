//! Canonical leveling and streak rules for persisted progress.
//!
//! Levels sit on a flat curve of `XP_PER_LEVEL` XP each. The growing curve shown
//! by the client meter lives in `ui_meter` and never feeds back into storage.

use chrono::NaiveDate;
use serde::Serialize;

pub const XP_PER_LEVEL: u32 = 100;

/// `floor(xp / 100) + 1`
pub fn level_for_xp(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct LevelSummary {
    pub level: u32,
    pub xp_into_level: u32,
    pub xp_to_next_level: u32,
}

pub fn level_summary(xp: u32) -> LevelSummary {
    let xp_into_level = xp % XP_PER_LEVEL;
    LevelSummary {
        level: level_for_xp(xp),
        xp_into_level,
        xp_to_next_level: XP_PER_LEVEL - xp_into_level,
    }
}

/// Streak length after activity on `today`.
///
/// Consecutive day extends the streak, a gap of two or more days restarts it
/// at 1, and a repeat on the same day leaves it unchanged. A last-active date
/// in the future (clock skew) is treated as same-day.
pub fn next_streak(current: u32, last_active: Option<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(last_active) = last_active else {
        return 1;
    };
    match (today - last_active).num_days() {
        1 => current.saturating_add(1),
        gap if gap > 1 => 1,
        _ => current,
    }
}

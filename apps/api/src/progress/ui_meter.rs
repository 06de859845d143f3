//! Cosmetic XP meter for instant client feedback (floating XP, level-up modal).
//!
//! Uses a growing curve: the first level needs 100 XP and each level-up
//! multiplies the requirement by 1.5. This is display-only and independent of
//! the persisted flat curve in `leveling`; the two are never reconciled.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const INITIAL_LEVEL_XP: u32 = 100;
/// Largest single gain the meter will animate.
pub const MAX_METER_GAIN: u32 = 100_000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct XpMeter {
    pub level: u32,
    /// XP accumulated inside the current level.
    pub xp: u32,
    pub next_level_xp: u32,
}

impl Default for XpMeter {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            next_level_xp: INITIAL_LEVEL_XP,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MeterAdvance {
    pub meter: XpMeter,
    pub levels_gained: u32,
    /// Fill ratio of the progress bar, 0.0 – 1.0.
    pub progress: f64,
}

impl XpMeter {
    /// Rejects meter state that cannot lie on the curve, and oversized gains.
    pub fn validate(&self, gained: u32) -> Result<(), AppError> {
        if self.level == 0 {
            return Err(AppError::Validation("meter level must be at least 1".to_string()));
        }
        if self.next_level_xp < INITIAL_LEVEL_XP {
            return Err(AppError::Validation(format!(
                "meter next_level_xp must be at least {INITIAL_LEVEL_XP}"
            )));
        }
        if self.xp >= self.next_level_xp {
            return Err(AppError::Validation(
                "meter xp must be below next_level_xp".to_string(),
            ));
        }
        if gained > MAX_METER_GAIN {
            return Err(AppError::Validation(format!(
                "gained_xp must be at most {MAX_METER_GAIN}"
            )));
        }
        Ok(())
    }

    /// Adds `gained` XP, carrying overflow into subsequent levels.
    ///
    /// The requirement never drops below `INITIAL_LEVEL_XP`, so it grows by at
    /// least half each level and the loop runs a logarithmic number of times.
    pub fn gain(mut self, gained: u32) -> MeterAdvance {
        self.next_level_xp = self.next_level_xp.max(INITIAL_LEVEL_XP);

        self.xp = self.xp.saturating_add(gained);
        let mut levels_gained = 0;
        while self.xp >= self.next_level_xp {
            self.xp -= self.next_level_xp;
            self.level = self.level.saturating_add(1);
            self.next_level_xp = grow(self.next_level_xp);
            levels_gained += 1;
        }

        MeterAdvance {
            progress: f64::from(self.xp) / f64::from(self.next_level_xp),
            meter: self,
            levels_gained,
        }
    }
}

fn grow(next_level_xp: u32) -> u32 {
    next_level_xp.saturating_add(next_level_xp / 2)
}

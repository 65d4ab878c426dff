//! XP curve and level titles

use serde::{Deserialize, Serialize};

/// Where a total XP amount lands on the level curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: u32,
    /// XP accumulated inside the current level
    pub current_xp: u64,
    /// XP the current level costs to clear
    pub next_level_xp: u64,
}

impl LevelInfo {
    /// Rounded percentage of the way through the current level
    pub fn progress_percent(&self) -> u32 {
        if self.next_level_xp == 0 {
            return 0;
        }
        ((self.current_xp as f64 / self.next_level_xp as f64) * 100.0).round() as u32
    }

    pub fn title(&self) -> &'static str {
        level_title(self.level)
    }
}

/// XP needed to clear `level`. Levels below 1 are treated as 1.
pub fn xp_cost(level: u32) -> u64 {
    let level = level.max(1) as u64;
    level * 100 + (level - 1) * 50
}

/// Walk the curve from level 1, paying each level's cost while the balance allows
pub fn level_from_xp(total_xp: u64) -> LevelInfo {
    let mut level = 1;
    let mut remaining = total_xp;
    loop {
        let needed = xp_cost(level);
        if remaining < needed {
            return LevelInfo {
                level,
                current_xp: remaining,
                next_level_xp: needed,
            };
        }
        remaining -= needed;
        level += 1;
    }
}

/// Level title thresholds, highest first
static TITLES: &[(u32, &str)] = &[
    (50, "Deus Gamer"),
    (40, "Lenda Viva"),
    (30, "Mestre"),
    (20, "Veterano"),
    (15, "Experiente"),
    (10, "Dedicado"),
    (5, "Iniciante"),
];

pub fn level_title(level: u32) -> &'static str {
    TITLES
        .iter()
        .find(|(min, _)| level >= *min)
        .map(|(_, title)| *title)
        .unwrap_or("Novato")
}

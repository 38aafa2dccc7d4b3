//! Per-week achievement latches.
//!
//! Each week has one latch per category plus one for the whole week. A
//! latch only ever goes from unset to set, except when the week is reset.
//! A single evaluation pass emits at most one notification.

use crate::goals::Category;
use crate::progress::CategoryPercentages;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub show_achievement_popups: bool,
    pub show_weekly_completion_popups: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            show_achievement_popups: true,
            show_weekly_completion_popups: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WeeklyAchievements {
    pub recovery: bool,
    pub strength: bool,
    pub cardio: bool,
    pub hiit: bool,
    pub all_complete: bool,
}

impl WeeklyAchievements {
    pub fn is_achieved(&self, category: Category) -> bool {
        match category {
            Category::Recovery => self.recovery,
            Category::Strength => self.strength,
            Category::Cardio => self.cardio,
            Category::Hiit => self.hiit,
        }
    }

    fn latch(&mut self, category: Category) {
        match category {
            Category::Recovery => self.recovery = true,
            Category::Strength => self.strength = true,
            Category::Cardio => self.cardio = true,
            Category::Hiit => self.hiit = true,
        }
    }

    pub fn every_category(&self) -> bool {
        Category::CHECK_ORDER
            .iter()
            .all(|&category| self.is_achieved(category))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AchievementEvent {
    CategoryAchieved { week: u32, category: Category },
    WeeklyMissionComplete { week: u32 },
}

/// Latch sets for one user, keyed by week number.
#[derive(Debug, Clone, Default)]
pub struct AchievementBook {
    weeks: BTreeMap<u32, WeeklyAchievements>,
}

impl AchievementBook {
    pub fn week(&self, week: u32) -> WeeklyAchievements {
        self.weeks.get(&week).copied().unwrap_or_default()
    }

    /// Runs one recomputation pass for `week` against its current
    /// percentages. Only that week's latches are read or written.
    pub fn evaluate(
        &mut self,
        week: u32,
        progress: &CategoryPercentages,
        settings: &NotificationSettings,
    ) -> Option<AchievementEvent> {
        if !settings.show_achievement_popups {
            return None;
        }

        let latches = self.weeks.entry(week).or_default();

        let crossed = Category::CHECK_ORDER
            .into_iter()
            .find(|&category| progress.get(category) >= 100.0 && !latches.is_achieved(category));
        if let Some(category) = crossed {
            latches.latch(category);
            return Some(AchievementEvent::CategoryAchieved { week, category });
        }

        if latches.every_category() && !latches.all_complete {
            latches.all_complete = true;
            if settings.show_weekly_completion_popups {
                return Some(AchievementEvent::WeeklyMissionComplete { week });
            }
        }

        None
    }

    pub fn reset_week(&mut self, week: u32) {
        self.weeks.insert(week, WeeklyAchievements::default());
    }

    pub fn reset_all(&mut self) {
        self.weeks.clear();
    }
}

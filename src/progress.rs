//! Weekly aggregation and overall progress.
//!
//! Logs are reduced into per-week totals, each week is converted into four
//! category percentages, and the percentages are averaged across every week
//! that has at least one entry. Weeks without entries are left out of the
//! average entirely; a week with entries that are all zero still counts.

use crate::goals::{CardioGroup, CardioModality, Category, GoalTable};
use crate::models::WorkoutLogEntry;
use crate::ranks::{RankDefinition, RankTable};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CardioTotals {
    pub run_ruck_walk: f64,
    pub elliptical_row: f64,
    pub swim: f64,
    pub cycle: f64,
}

impl CardioTotals {
    pub fn get(&self, group: CardioGroup) -> f64 {
        match group {
            CardioGroup::RunRuckWalk => self.run_ruck_walk,
            CardioGroup::EllipticalRow => self.elliptical_row,
            CardioGroup::Swim => self.swim,
            CardioGroup::Cycle => self.cycle,
        }
    }

    fn add(&mut self, group: CardioGroup, value: f64) {
        let slot = match group {
            CardioGroup::RunRuckWalk => &mut self.run_ruck_walk,
            CardioGroup::EllipticalRow => &mut self.elliptical_row,
            CardioGroup::Swim => &mut self.swim,
            CardioGroup::Cycle => &mut self.cycle,
        };
        *slot += value;
    }
}

/// Sums of one user's entries for a single week.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WeeklyTotals {
    pub entries: usize,
    pub recovery_minutes: f64,
    pub strength_lbs: f64,
    pub hiit_minutes: f64,
    /// Raw distances per cardio group, for display.
    pub cardio: CardioTotals,
    /// Accumulated per-entry cardio percentages. Already a percentage.
    pub cardio_percent: f64,
}

impl WeeklyTotals {
    fn add_entry(&mut self, entry: &WorkoutLogEntry, goals: &GoalTable) {
        self.entries += 1;
        self.recovery_minutes += entry.recovery_minutes;
        self.strength_lbs += entry.strength_lbs;
        self.hiit_minutes += entry.hiit_minutes;
        for modality in CardioModality::ALL {
            self.cardio.add(modality.group(), entry.cardio(modality));
        }
        self.cardio_percent += entry.cardio_percent(goals);
    }

    pub fn percentages(&self, goals: &GoalTable) -> CategoryPercentages {
        CategoryPercentages {
            recovery: self.recovery_minutes / goals.recovery_minutes * 100.0,
            strength: self.strength_lbs / goals.strength_lbs * 100.0,
            cardio: self.cardio_percent,
            hiit: self.hiit_minutes / goals.hiit_minutes * 100.0,
        }
    }
}

/// Four unclamped category percentages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CategoryPercentages {
    pub recovery: f64,
    pub strength: f64,
    pub cardio: f64,
    pub hiit: f64,
}

impl CategoryPercentages {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Recovery => self.recovery,
            Category::Strength => self.strength,
            Category::Cardio => self.cardio,
            Category::Hiit => self.hiit,
        }
    }

    pub fn mean(&self) -> f64 {
        (self.recovery + self.strength + self.hiit + self.cardio) / 4.0
    }
}

/// Groups entries by week. Weeks with no entries are absent from the map.
pub fn aggregate_weeks(logs: &[WorkoutLogEntry], goals: &GoalTable) -> BTreeMap<u32, WeeklyTotals> {
    let mut weeks: BTreeMap<u32, WeeklyTotals> = BTreeMap::new();
    for entry in logs {
        weeks.entry(entry.week).or_default().add_entry(entry, goals);
    }
    weeks
}

/// Per-category percentages averaged over the observed weeks.
pub fn category_averages(
    weeks: &BTreeMap<u32, WeeklyTotals>,
    goals: &GoalTable,
) -> CategoryPercentages {
    if weeks.is_empty() {
        return CategoryPercentages::default();
    }

    let mut sum = CategoryPercentages::default();
    for totals in weeks.values() {
        let week = totals.percentages(goals);
        sum.recovery += week.recovery;
        sum.strength += week.strength;
        sum.cardio += week.cardio;
        sum.hiit += week.hiit;
    }

    let count = weeks.len() as f64;
    CategoryPercentages {
        recovery: sum.recovery / count,
        strength: sum.strength / count,
        cardio: sum.cardio / count,
        hiit: sum.hiit / count,
    }
}

pub fn overall_progress(weeks: &BTreeMap<u32, WeeklyTotals>, goals: &GoalTable) -> f64 {
    if weeks.is_empty() {
        return 0.0;
    }
    category_averages(weeks, goals).mean()
}

pub fn progress_for_logs(logs: &[WorkoutLogEntry], goals: &GoalTable) -> f64 {
    overall_progress(&aggregate_weeks(logs, goals), goals)
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub week: u32,
    pub week_totals: WeeklyTotals,
    pub week_percentages: CategoryPercentages,
    pub averages: CategoryPercentages,
    pub overall: f64,
    pub weeks_logged: usize,
    pub rank: RankDefinition,
    pub next_rank: Option<RankDefinition>,
    pub gap_to_next: Option<f64>,
}

/// Full report for one user with `week` as the displayed week.
pub fn build_report(
    logs: &[WorkoutLogEntry],
    week: u32,
    goals: &GoalTable,
    ranks: &RankTable,
) -> ProgressReport {
    let weeks = aggregate_weeks(logs, goals);
    let week_totals = weeks.get(&week).copied().unwrap_or_default();
    let overall = overall_progress(&weeks, goals);

    ProgressReport {
        week,
        week_percentages: week_totals.percentages(goals),
        week_totals,
        averages: category_averages(&weeks, goals),
        overall,
        weeks_logged: weeks.len(),
        rank: ranks.current(overall).clone(),
        next_rank: ranks.next(overall).cloned(),
        gap_to_next: ranks.gap_to_next(overall),
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Recovery,
    Strength,
    Cardio,
    Hiit,
}

impl Category {
    /// Order in which weekly achievements are checked.
    pub const CHECK_ORDER: [Category; 4] = [
        Category::Recovery,
        Category::Strength,
        Category::Cardio,
        Category::Hiit,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Recovery => "TMAR-M",
            Category::Strength => "Strength & Resistance",
            Category::Cardio => "Cardio",
            Category::Hiit => "HIIT",
        }
    }
}

/// The four cardio sub-goals. Each one is worth 100% of a week on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardioGroup {
    RunRuckWalk,
    EllipticalRow,
    Swim,
    Cycle,
}

impl CardioGroup {
    pub const ALL: [CardioGroup; 4] = [
        CardioGroup::RunRuckWalk,
        CardioGroup::EllipticalRow,
        CardioGroup::Swim,
        CardioGroup::Cycle,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CardioGroup::RunRuckWalk => "Run/Ruck/Walk",
            CardioGroup::EllipticalRow => "Elliptical/Row",
            CardioGroup::Swim => "Swim",
            CardioGroup::Cycle => "Cycle",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            CardioGroup::Swim => "meters",
            _ => "miles",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardioModality {
    Running,
    Rucking,
    Walking,
    Elliptical,
    Rowing,
    Swimming,
    Cycling,
}

impl CardioModality {
    pub const ALL: [CardioModality; 7] = [
        CardioModality::Running,
        CardioModality::Rucking,
        CardioModality::Walking,
        CardioModality::Elliptical,
        CardioModality::Rowing,
        CardioModality::Swimming,
        CardioModality::Cycling,
    ];

    pub fn group(self) -> CardioGroup {
        match self {
            CardioModality::Running | CardioModality::Rucking | CardioModality::Walking => {
                CardioGroup::RunRuckWalk
            }
            CardioModality::Elliptical | CardioModality::Rowing => CardioGroup::EllipticalRow,
            CardioModality::Swimming => CardioGroup::Swim,
            CardioModality::Cycling => CardioGroup::Cycle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardioGoals {
    pub run_ruck_walk_miles: f64,
    pub elliptical_row_miles: f64,
    pub swim_meters: f64,
    pub cycle_miles: f64,
}

impl CardioGoals {
    pub fn goal(&self, group: CardioGroup) -> f64 {
        match group {
            CardioGroup::RunRuckWalk => self.run_ruck_walk_miles,
            CardioGroup::EllipticalRow => self.elliptical_row_miles,
            CardioGroup::Swim => self.swim_meters,
            CardioGroup::Cycle => self.cycle_miles,
        }
    }
}

impl Default for CardioGoals {
    fn default() -> Self {
        Self {
            run_ruck_walk_miles: 12.0,
            elliptical_row_miles: 15.0,
            swim_meters: 3200.0,
            cycle_miles: 40.0,
        }
    }
}

/// Weekly targets for every category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalTable {
    pub recovery_minutes: f64,
    pub strength_lbs: f64,
    pub hiit_minutes: f64,
    pub cardio: CardioGoals,
}

impl Default for GoalTable {
    fn default() -> Self {
        Self {
            recovery_minutes: 60.0,
            strength_lbs: 5000.0,
            hiit_minutes: 45.0,
            cardio: CardioGoals::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("goal for {name} must be a positive number, got {value}")]
pub struct InvalidGoal {
    pub name: &'static str,
    pub value: f64,
}

impl GoalTable {
    /// Scalar weekly goal for a category. Cardio has no single goal and
    /// returns `None`; its progress is already a percentage sum.
    pub fn weekly_goal(&self, category: Category) -> Option<f64> {
        match category {
            Category::Recovery => Some(self.recovery_minutes),
            Category::Strength => Some(self.strength_lbs),
            Category::Hiit => Some(self.hiit_minutes),
            Category::Cardio => None,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidGoal> {
        let goals = [
            ("recovery", self.recovery_minutes),
            ("strength", self.strength_lbs),
            ("hiit", self.hiit_minutes),
            ("run/ruck/walk", self.cardio.run_ruck_walk_miles),
            ("elliptical/row", self.cardio.elliptical_row_miles),
            ("swim", self.cardio.swim_meters),
            ("cycle", self.cardio.cycle_miles),
        ];
        for (name, value) in goals {
            if !(value.is_finite() && value > 0.0) {
                return Err(InvalidGoal { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modalities_map_to_their_groups() {
        assert_eq!(CardioModality::Rucking.group(), CardioGroup::RunRuckWalk);
        assert_eq!(CardioModality::Walking.group(), CardioGroup::RunRuckWalk);
        assert_eq!(CardioModality::Rowing.group(), CardioGroup::EllipticalRow);
        assert_eq!(CardioModality::Swimming.group(), CardioGroup::Swim);
        assert_eq!(CardioModality::Cycling.group(), CardioGroup::Cycle);
    }

    #[test]
    fn default_goals_are_valid() {
        let goals = GoalTable::default();
        assert!(goals.validate().is_ok());
        assert_eq!(goals.weekly_goal(Category::Strength), Some(5000.0));
        assert_eq!(goals.weekly_goal(Category::Cardio), None);
        assert_eq!(goals.cardio.goal(CardioGroup::Swim), 3200.0);
    }

    #[test]
    fn zero_goal_is_rejected() {
        let mut goals = GoalTable::default();
        goals.cardio.cycle_miles = 0.0;
        let err = goals.validate().unwrap_err();
        assert_eq!(err.name, "cycle");
    }
}

use crate::goals::{GoalTable, InvalidGoal};
use crate::ranks::RankTable;
use chrono::NaiveDate;
use std::env;
use thiserror::Error;

pub const DEFAULT_START_DATE: (i32, u32, u32) = (2026, 1, 12);
pub const DEFAULT_WEEKS: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CHALLENGE_START_DATE must be YYYY-MM-DD, got '{0}'")]
    StartDate(String),
    #[error("CHALLENGE_WEEKS must be a positive integer, got '{0}'")]
    Weeks(String),
    #[error(transparent)]
    Goal(#[from] InvalidGoal),
}

/// Static parameters of one challenge instance.
#[derive(Debug, Clone)]
pub struct ChallengeConfig {
    pub start_date: NaiveDate,
    pub weeks: u32,
    pub goals: GoalTable,
    pub ranks: RankTable,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        let (year, month, day) = DEFAULT_START_DATE;
        Self {
            start_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
            weeks: DEFAULT_WEEKS,
            goals: GoalTable::default(),
            ranks: RankTable::default(),
        }
    }
}

impl ChallengeConfig {
    /// Reads `CHALLENGE_START_DATE` and `CHALLENGE_WEEKS`, falling back to
    /// the defaults when they are unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            env::var("CHALLENGE_START_DATE").ok().as_deref(),
            env::var("CHALLENGE_WEEKS").ok().as_deref(),
        )
    }

    pub fn from_values(start_date: Option<&str>, weeks: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = start_date {
            config.start_date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| ConfigError::StartDate(raw.to_string()))?;
        }

        if let Some(raw) = weeks {
            config.weeks = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|weeks| *weeks > 0)
                .ok_or_else(|| ConfigError::Weeks(raw.to_string()))?;
        }

        config.goals.validate()?;
        Ok(config)
    }

    /// Challenge week containing `today`, clamped to `1..=weeks`.
    pub fn current_week(&self, today: NaiveDate) -> u32 {
        let days = (today - self.start_date).num_days();
        if days < 0 {
            return 1;
        }
        let week = days / 7 + 1;
        u32::try_from(week).unwrap_or(self.weeks).min(self.weeks)
    }

    pub fn contains_week(&self, week: u32) -> bool {
        (1..=self.weeks).contains(&week)
    }
}

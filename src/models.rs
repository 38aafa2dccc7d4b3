use crate::achievements::{AchievementEvent, NotificationSettings};
use crate::errors::LogValidationError;
use crate::goals::{CardioGroup, CardioModality, GoalTable};
use crate::leaderboard::Board;
use crate::progress::ProgressReport;
use crate::ranks::RankDefinition;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One submitted workout. Entries are never edited, only deleted in bulk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLogEntry {
    pub id: Uuid,
    pub user_id: String,
    pub week: u32,
    pub logged_at: DateTime<Utc>,
    #[serde(default)]
    pub recovery_minutes: f64,
    #[serde(default)]
    pub strength_lbs: f64,
    #[serde(default)]
    pub hiit_minutes: f64,
    #[serde(default)]
    pub running_miles: f64,
    #[serde(default)]
    pub rucking_miles: f64,
    #[serde(default)]
    pub walking_miles: f64,
    #[serde(default)]
    pub elliptical_miles: f64,
    #[serde(default)]
    pub rowing_miles: f64,
    #[serde(default)]
    pub swimming_meters: f64,
    #[serde(default)]
    pub cycling_miles: f64,
}

impl WorkoutLogEntry {
    /// Blank entry for `user_id` in `week`, all metrics zero.
    pub fn new(user_id: impl Into<String>, week: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            week,
            logged_at: Utc::now(),
            recovery_minutes: 0.0,
            strength_lbs: 0.0,
            hiit_minutes: 0.0,
            running_miles: 0.0,
            rucking_miles: 0.0,
            walking_miles: 0.0,
            elliptical_miles: 0.0,
            rowing_miles: 0.0,
            swimming_meters: 0.0,
            cycling_miles: 0.0,
        }
    }

    pub fn cardio(&self, modality: CardioModality) -> f64 {
        match modality {
            CardioModality::Running => self.running_miles,
            CardioModality::Rucking => self.rucking_miles,
            CardioModality::Walking => self.walking_miles,
            CardioModality::Elliptical => self.elliptical_miles,
            CardioModality::Rowing => self.rowing_miles,
            CardioModality::Swimming => self.swimming_meters,
            CardioModality::Cycling => self.cycling_miles,
        }
    }

    /// This entry's contribution to the week's cardio percentage: each
    /// modality divided by its group's sub-goal, summed, times 100.
    pub fn cardio_percent(&self, goals: &GoalTable) -> f64 {
        let ratio: f64 = CardioModality::ALL
            .iter()
            .map(|&modality| self.cardio(modality) / goals.cardio.goal(modality.group()))
            .sum();
        ratio * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantCategory {
    Soldier,
    #[default]
    Civilian,
    Family,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DutyStatus {
    #[serde(rename = "IMA")]
    Ima,
    #[serde(rename = "TPU")]
    Tpu,
    #[serde(rename = "AGR")]
    Agr,
    #[serde(rename = "T10")]
    T10,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub participant_category: ParticipantCategory,
    /// Only meaningful for soldiers.
    #[serde(default)]
    pub duty_status: Option<DutyStatus>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default = "default_available_cardio")]
    pub available_cardio: Vec<CardioGroup>,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            participant_category: ParticipantCategory::default(),
            duty_status: None,
            team_name: None,
            available_cardio: default_available_cardio(),
            notifications: NotificationSettings::default(),
        }
    }

    pub fn is_soldier(&self) -> bool {
        self.participant_category == ParticipantCategory::Soldier
    }

    pub fn team(&self) -> Option<&str> {
        self.team_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

fn default_available_cardio() -> Vec<CardioGroup> {
    CardioGroup::ALL.to_vec()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub users: Vec<UserProfile>,
    #[serde(default)]
    pub logs: Vec<WorkoutLogEntry>,
}

impl AppData {
    pub fn user(&self, user_id: &str) -> Option<&UserProfile> {
        self.users.iter().find(|user| user.id == user_id)
    }

    pub fn user_mut(&mut self, user_id: &str) -> Option<&mut UserProfile> {
        self.users.iter_mut().find(|user| user.id == user_id)
    }

    pub fn logs_for(&self, user_id: &str) -> Vec<WorkoutLogEntry> {
        self.logs
            .iter()
            .filter(|log| log.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Removes the user's entries, optionally only those of one week.
    /// Returns how many were removed.
    pub fn remove_logs(&mut self, user_id: &str, week: Option<u32>) -> usize {
        let before = self.logs.len();
        self.logs.retain(|log| {
            log.user_id != user_id || week.is_some_and(|week| log.week != week)
        });
        before - self.logs.len()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpsertProfileRequest {
    pub display_name: String,
    #[serde(default)]
    pub participant_category: ParticipantCategory,
    #[serde(default)]
    pub duty_status: Option<DutyStatus>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub available_cardio: Option<Vec<CardioGroup>>,
}

/// Workout form payload. Every metric is optional and defaults to zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkoutSubmission {
    pub week: Option<u32>,
    pub recovery_minutes: f64,
    pub strength_lbs: f64,
    pub hiit_minutes: f64,
    pub running_miles: f64,
    pub rucking_miles: f64,
    pub walking_miles: f64,
    pub elliptical_miles: f64,
    pub rowing_miles: f64,
    pub swimming_meters: f64,
    pub cycling_miles: f64,
}

impl WorkoutSubmission {
    pub fn into_entry(
        self,
        user_id: &str,
        week: u32,
        logged_at: DateTime<Utc>,
    ) -> Result<WorkoutLogEntry, LogValidationError> {
        let fields = [
            ("recovery_minutes", self.recovery_minutes),
            ("strength_lbs", self.strength_lbs),
            ("hiit_minutes", self.hiit_minutes),
            ("running_miles", self.running_miles),
            ("rucking_miles", self.rucking_miles),
            ("walking_miles", self.walking_miles),
            ("elliptical_miles", self.elliptical_miles),
            ("rowing_miles", self.rowing_miles),
            ("swimming_meters", self.swimming_meters),
            ("cycling_miles", self.cycling_miles),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(LogValidationError::InvalidMetric { field, value });
            }
        }

        Ok(WorkoutLogEntry {
            logged_at,
            recovery_minutes: self.recovery_minutes,
            strength_lbs: self.strength_lbs,
            hiit_minutes: self.hiit_minutes,
            running_miles: self.running_miles,
            rucking_miles: self.rucking_miles,
            walking_miles: self.walking_miles,
            elliptical_miles: self.elliptical_miles,
            rowing_miles: self.rowing_miles,
            swimming_meters: self.swimming_meters,
            cycling_miles: self.cycling_miles,
            ..WorkoutLogEntry::new(user_id, week)
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub week: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub board: Board,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub user: Option<String>,
    pub week: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct WorkoutSubmitted {
    pub entry: WorkoutLogEntry,
    pub progress: ProgressReport,
    pub achievement: Option<AchievementEvent>,
}

#[derive(Debug, Serialize)]
pub struct AchievementPass {
    pub week: u32,
    pub achievement: Option<AchievementEvent>,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub removed: usize,
}

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub start_date: NaiveDate,
    pub weeks: u32,
    pub current_week: u32,
    pub goals: GoalTable,
}

#[derive(Debug, Serialize)]
pub struct RanksResponse {
    pub ranks: Vec<RankDefinition>,
}

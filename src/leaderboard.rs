use crate::goals::GoalTable;
use crate::models::{UserProfile, WorkoutLogEntry};
use crate::progress::progress_for_logs;
use crate::ranks::RankTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Board {
    /// Soldiers ranked individually.
    #[default]
    Individual,
    /// Soldier teams.
    Teams,
    /// Teams formed by civilians and family members.
    Community,
    /// Civilians and family ranked individually.
    Family,
}

impl Board {
    pub fn is_team_board(self) -> bool {
        matches!(self, Board::Teams | Board::Community)
    }

    fn admits(self, user: &UserProfile) -> bool {
        match self {
            Board::Individual => user.is_soldier(),
            Board::Teams => user.is_soldier() && user.team().is_some(),
            Board::Community => !user.is_soldier() && user.team().is_some(),
            Board::Family => !user.is_soldier(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub position: usize,
    pub user_id: String,
    pub display_name: String,
    pub team_name: Option<String>,
    pub progress: f64,
    pub rank: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamMember {
    pub user_id: String,
    pub display_name: String,
    pub progress: f64,
    pub rank: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamEntry {
    pub position: usize,
    pub name: String,
    pub average_progress: f64,
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "entries", rename_all = "snake_case")]
pub enum Leaderboard {
    Individuals(Vec<LeaderboardEntry>),
    Teams(Vec<TeamEntry>),
}

/// Computes every admitted user's overall progress from their own logs.
/// Users keep their registration order so later stable sorts leave ties
/// in that order.
fn scored_users<'a>(
    board: Board,
    users: &'a [UserProfile],
    logs: &[WorkoutLogEntry],
    goals: &GoalTable,
) -> Vec<(&'a UserProfile, f64)> {
    let mut logs_by_user: HashMap<&str, Vec<WorkoutLogEntry>> = HashMap::new();
    for log in logs {
        logs_by_user
            .entry(log.user_id.as_str())
            .or_default()
            .push(log.clone());
    }

    users
        .iter()
        .filter(|user| board.admits(user))
        .map(|user| {
            let progress = logs_by_user
                .get(user.id.as_str())
                .map(|user_logs| progress_for_logs(user_logs, goals))
                .unwrap_or(0.0);
            (user, progress)
        })
        .collect()
}

pub fn individual_board(
    board: Board,
    users: &[UserProfile],
    logs: &[WorkoutLogEntry],
    goals: &GoalTable,
    ranks: &RankTable,
) -> Vec<LeaderboardEntry> {
    let mut scored = scored_users(board, users, logs, goals);
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    scored
        .into_iter()
        .enumerate()
        .map(|(index, (user, progress))| LeaderboardEntry {
            position: index + 1,
            user_id: user.id.clone(),
            display_name: user.display_name.clone(),
            team_name: user.team().map(str::to_string),
            progress,
            rank: ranks.current(progress).name.clone(),
        })
        .collect()
}

/// Teams ranked by the mean progress of their members.
pub fn team_board(
    board: Board,
    users: &[UserProfile],
    logs: &[WorkoutLogEntry],
    goals: &GoalTable,
    ranks: &RankTable,
) -> Vec<TeamEntry> {
    let mut teams: Vec<(String, Vec<TeamMember>)> = Vec::new();
    for (user, progress) in scored_users(board, users, logs, goals) {
        let Some(name) = user.team() else {
            continue;
        };
        let member = TeamMember {
            user_id: user.id.clone(),
            display_name: user.display_name.clone(),
            progress,
            rank: ranks.current(progress).name.clone(),
        };
        match teams.iter_mut().find(|(team, _)| team == name) {
            Some((_, members)) => members.push(member),
            None => teams.push((name.to_string(), vec![member])),
        }
    }

    let mut ranked: Vec<(String, f64, Vec<TeamMember>)> = teams
        .into_iter()
        .map(|(name, members)| {
            let total: f64 = members.iter().map(|member| member.progress).sum();
            let average = if members.is_empty() {
                0.0
            } else {
                total / members.len() as f64
            };
            (name, average, members)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, (name, average_progress, members))| TeamEntry {
            position: index + 1,
            name,
            average_progress,
            members,
        })
        .collect()
}

pub fn build_leaderboard(
    board: Board,
    users: &[UserProfile],
    logs: &[WorkoutLogEntry],
    goals: &GoalTable,
    ranks: &RankTable,
) -> Leaderboard {
    if board.is_team_board() {
        Leaderboard::Teams(team_board(board, users, logs, goals, ranks))
    } else {
        Leaderboard::Individuals(individual_board(board, users, logs, goals, ranks))
    }
}

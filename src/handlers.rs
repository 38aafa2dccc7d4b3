use crate::achievements::NotificationSettings;
use crate::config::ChallengeConfig;
use crate::errors::{AppError, LogValidationError};
use crate::leaderboard::{build_leaderboard, Leaderboard};
use crate::models::{
    AchievementPass, AppData, ConfigResponse, DashboardQuery, LeaderboardQuery, ParticipantCategory,
    RanksResponse, ResetResponse, UpsertProfileRequest, UserProfile, WeekQuery, WorkoutLogEntry,
    WorkoutSubmission, WorkoutSubmitted,
};
use crate::progress::{build_report, ProgressReport};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::ui::render_dashboard;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use chrono::{Local, Utc};
use tracing::info;

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Html<String> {
    let config = &state.config;
    let data = state.data.lock().await;
    let participant = query.user.as_deref().and_then(|id| data.user(id)).map(|user| {
        let week = query
            .week
            .filter(|week| config.contains_week(*week))
            .unwrap_or_else(|| current_week(config));
        let logs = data.logs_for(&user.id);
        (user, build_report(&logs, week, &config.goals, &config.ranks))
    });

    Html(render_dashboard(config, participant.as_ref().map(|(user, report)| (*user, report))))
}

pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let config = &state.config;
    Json(ConfigResponse {
        start_date: config.start_date,
        weeks: config.weeks,
        current_week: current_week(config),
        goals: config.goals,
    })
}

pub async fn get_ranks(State(state): State<AppState>) -> Json<RanksResponse> {
    Json(RanksResponse {
        ranks: state.config.ranks.ranks().to_vec(),
    })
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Json<Leaderboard> {
    let data = state.data.lock().await;
    let config = &state.config;
    Json(build_leaderboard(
        query.board,
        &data.users,
        &data.logs,
        &config.goals,
        &config.ranks,
    ))
}

pub async fn upsert_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpsertProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let user_id = user_id.trim().to_string();
    let display_name = payload.display_name.trim();
    if user_id.is_empty() {
        return Err(AppError::bad_request("user id must not be empty"));
    }
    if display_name.is_empty() {
        return Err(AppError::bad_request("display_name must not be empty"));
    }

    let mut data = state.data.lock().await;
    let existing = data.user(&user_id).cloned();
    let mut profile = existing
        .clone()
        .unwrap_or_else(|| UserProfile::new(user_id.clone(), display_name));
    profile.display_name = display_name.to_string();
    profile.participant_category = payload.participant_category;
    profile.duty_status = match payload.participant_category {
        ParticipantCategory::Soldier => payload.duty_status,
        _ => None,
    };
    profile.team_name = payload
        .team_name
        .map(|team| team.trim().to_string())
        .filter(|team| !team.is_empty());
    if let Some(available) = payload.available_cardio {
        profile.available_cardio = available;
    }

    match data.user_mut(&user_id) {
        Some(slot) => *slot = profile.clone(),
        None => data.users.push(profile.clone()),
    }
    persist_data(&state.data_path, &data).await?;

    info!(
        user_id = %profile.id,
        created = existing.is_none(),
        category = ?profile.participant_category,
        "profile saved"
    );
    Ok(Json(profile))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(settings): Json<NotificationSettings>,
) -> Result<Json<UserProfile>, AppError> {
    let mut data = state.data.lock().await;
    let profile = {
        let user = data
            .user_mut(&user_id)
            .ok_or_else(|| unknown_user(&user_id))?;
        user.notifications = settings;
        user.clone()
    };
    persist_data(&state.data_path, &data).await?;
    Ok(Json(profile))
}

pub async fn get_progress(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<ProgressReport>, AppError> {
    let config = &state.config;
    let week = resolve_week(config, query.week)?;
    let data = state.data.lock().await;
    require_user(&data, &user_id)?;

    let logs = data.logs_for(&user_id);
    Ok(Json(build_report(&logs, week, &config.goals, &config.ranks)))
}

pub async fn list_logs(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<WorkoutLogEntry>>, AppError> {
    let data = state.data.lock().await;
    require_user(&data, &user_id)?;
    Ok(Json(data.logs_for(&user_id)))
}

pub async fn submit_workout(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<WorkoutSubmission>,
) -> Result<Json<WorkoutSubmitted>, AppError> {
    let config = &state.config;
    let week = resolve_week(config, payload.week)?;
    let entry = payload.into_entry(&user_id, week, Utc::now())?;

    let mut data = state.data.lock().await;
    let settings = require_user(&data, &user_id)?.notifications;
    data.logs.push(entry.clone());
    persist_data(&state.data_path, &data).await?;

    let logs = data.logs_for(&user_id);
    let progress = build_report(&logs, week, &config.goals, &config.ranks);

    let mut achievements = state.achievements.lock().await;
    let achievement = achievements
        .entry(user_id.clone())
        .or_default()
        .evaluate(week, &progress.week_percentages, &settings);

    info!(
        user_id = %user_id,
        week,
        entry_id = %entry.id,
        overall = progress.overall,
        "workout logged"
    );
    if let Some(event) = &achievement {
        info!(user_id = %user_id, ?event, "achievement unlocked");
    }

    Ok(Json(WorkoutSubmitted {
        entry,
        progress,
        achievement,
    }))
}

pub async fn check_achievements(
    State(state): State<AppState>,
    Path((user_id, week)): Path<(String, u32)>,
) -> Result<Json<AchievementPass>, AppError> {
    let config = &state.config;
    let week = resolve_week(config, Some(week))?;
    let data = state.data.lock().await;
    let settings = require_user(&data, &user_id)?.notifications;
    let logs = data.logs_for(&user_id);
    let report = build_report(&logs, week, &config.goals, &config.ranks);

    let mut achievements = state.achievements.lock().await;
    let achievement = achievements
        .entry(user_id.clone())
        .or_default()
        .evaluate(week, &report.week_percentages, &settings);
    if let Some(event) = &achievement {
        info!(user_id = %user_id, ?event, "achievement unlocked");
    }

    Ok(Json(AchievementPass { week, achievement }))
}

pub async fn reset_week(
    State(state): State<AppState>,
    Path((user_id, week)): Path<(String, u32)>,
) -> Result<Json<ResetResponse>, AppError> {
    let week = resolve_week(&state.config, Some(week))?;
    let mut data = state.data.lock().await;
    require_user(&data, &user_id)?;
    let removed = data.remove_logs(&user_id, Some(week));
    persist_data(&state.data_path, &data).await?;

    state
        .achievements
        .lock()
        .await
        .entry(user_id.clone())
        .or_default()
        .reset_week(week);

    info!(user_id = %user_id, week, removed, "week reset");
    Ok(Json(ResetResponse { removed }))
}

pub async fn reset_all(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ResetResponse>, AppError> {
    let mut data = state.data.lock().await;
    require_user(&data, &user_id)?;
    let removed = data.remove_logs(&user_id, None);
    persist_data(&state.data_path, &data).await?;

    if let Some(book) = state.achievements.lock().await.get_mut(&user_id) {
        book.reset_all();
    }

    info!(user_id = %user_id, removed, "all data reset");
    Ok(Json(ResetResponse { removed }))
}

fn require_user<'a>(data: &'a AppData, user_id: &str) -> Result<&'a UserProfile, AppError> {
    data.user(user_id).ok_or_else(|| unknown_user(user_id))
}

fn unknown_user(user_id: &str) -> AppError {
    AppError::not_found(format!("unknown user '{user_id}'"))
}

fn resolve_week(config: &ChallengeConfig, week: Option<u32>) -> Result<u32, AppError> {
    let week = week.unwrap_or_else(|| current_week(config));
    if !config.contains_week(week) {
        return Err(LogValidationError::WeekOutOfRange {
            week,
            weeks: config.weeks,
        }
        .into());
    }
    Ok(week)
}

fn current_week(config: &ChallengeConfig) -> u32 {
    config.current_week(Local::now().date_naive())
}

use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/config", get(handlers::get_config))
        .route("/api/ranks", get(handlers::get_ranks))
        .route("/api/leaderboard", get(handlers::get_leaderboard))
        .route("/api/users/:user_id", put(handlers::upsert_user))
        .route("/api/users/:user_id/settings", put(handlers::update_settings))
        .route("/api/users/:user_id/progress", get(handlers::get_progress))
        .route(
            "/api/users/:user_id/logs",
            get(handlers::list_logs)
                .post(handlers::submit_workout)
                .delete(handlers::reset_all),
        )
        .route("/api/users/:user_id/weeks/:week", delete(handlers::reset_week))
        .route(
            "/api/users/:user_id/weeks/:week/achievements",
            post(handlers::check_achievements),
        )
        .with_state(state)
}

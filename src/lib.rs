pub mod achievements;
pub mod app;
pub mod config;
pub mod errors;
pub mod goals;
pub mod handlers;
pub mod leaderboard;
pub mod models;
pub mod progress;
pub mod ranks;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::ChallengeConfig;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};

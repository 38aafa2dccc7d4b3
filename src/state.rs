use crate::achievements::AchievementBook;
use crate::config::ChallengeConfig;
use crate::models::AppData;
use std::{collections::HashMap, path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub config: Arc<ChallengeConfig>,
    /// Achievement latches per user id. Kept in memory only.
    pub achievements: Arc<Mutex<HashMap<String, AchievementBook>>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData, config: ChallengeConfig) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            config: Arc::new(config),
            achievements: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

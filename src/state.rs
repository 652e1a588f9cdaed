use crate::config::GoalConfig;
use crate::models::TrackerData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub goals: GoalConfig,
    pub data: Arc<Mutex<TrackerData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, goals: GoalConfig, data: TrackerData) -> Self {
        Self {
            data_path,
            goals,
            data: Arc::new(Mutex::new(data)),
        }
    }
}

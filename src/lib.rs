pub mod app;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod quotes;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::{GoalConfig, ServerSettings};
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};

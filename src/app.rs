use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/dashboard", get(handlers::index))
        .route("/api/dashboard_stats", get(handlers::get_dashboard_stats))
        .route("/api/quote", get(handlers::get_quote))
        .route("/api/reset_weekly_progress", post(handlers::reset_weekly_progress))
        .route("/api/jobs", get(handlers::list_jobs).post(handlers::create_job))
        .route("/api/jobs/:id/status", post(handlers::update_job_status))
        .route("/api/jobs/:id/documents", post(handlers::record_documents))
        .with_state(state)
}

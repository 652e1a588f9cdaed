use crate::errors::AppError;
use crate::models::{
    Acknowledgement, DashboardStats, DocumentGeneration, DocumentKind, DocumentsRequest,
    JobRecord, JobStatus, JobsQuery, NewJobRequest, Quote, StatusUpdateRequest,
};
use crate::quotes::quote_of_the_day;
use crate::state::AppState;
use crate::stats::build_dashboard_stats;
use crate::storage::persist_data;
use crate::ui::render_dashboard;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use chrono::{Local, NaiveDateTime};
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_dashboard(&state.goals))
}

pub async fn get_dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(build_dashboard_stats(&data)))
}

pub async fn get_quote() -> Json<Quote> {
    Json(quote_of_the_day())
}

pub async fn reset_weekly_progress(
    State(state): State<AppState>,
) -> Result<Json<Acknowledgement>, AppError> {
    let mut data = state.data.lock().await;
    data.weekly_reset_at = Some(now());
    persist_data(&state.data_path, &data).await?;
    info!("weekly progress reset");

    Ok(Json(Acknowledgement {
        success: "Weekly progress reset.".to_string(),
    }))
}

pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobsQuery>,
) -> Result<Json<Vec<JobRecord>>, AppError> {
    let filter = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<JobStatus>().map_err(AppError::bad_request)?),
    };

    let data = state.data.lock().await;
    let jobs = data
        .jobs
        .values()
        .rev()
        .filter(|job| filter.is_none_or(|status| job.status == status))
        .cloned()
        .collect();

    Ok(Json(jobs))
}

pub async fn create_job(
    State(state): State<AppState>,
    Json(payload): Json<NewJobRequest>,
) -> Result<Json<JobRecord>, AppError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("title must not be empty"));
    }

    let mut data = state.data.lock().await;
    let id = data.allocate_id();
    let job = JobRecord {
        id,
        title: title.to_string(),
        company: payload.company.trim().to_string(),
        location: payload.location.trim().to_string(),
        job_url: payload.job_url,
        source: payload.source.trim().to_ascii_lowercase(),
        status: JobStatus::Inbox,
        date_loaded: now(),
        application_date: None,
    };
    data.jobs.insert(id, job.clone());
    persist_data(&state.data_path, &data).await?;

    Ok(Json(job))
}

pub async fn update_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<u64>,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<Json<Acknowledgement>, AppError> {
    if payload.status.trim().is_empty() {
        return Err(AppError::bad_request("new status not provided"));
    }
    let status = payload
        .status
        .parse::<JobStatus>()
        .map_err(AppError::bad_request)?;

    let mut data = state.data.lock().await;
    let job = data
        .jobs
        .get_mut(&job_id)
        .ok_or_else(|| AppError::not_found(format!("job {job_id} not found")))?;
    job.status = status;
    if status == JobStatus::Applied && job.application_date.is_none() {
        job.application_date = Some(now());
    }
    persist_data(&state.data_path, &data).await?;
    info!(job_id, %status, "job status updated");

    Ok(Json(Acknowledgement {
        success: format!("Job {job_id} status updated to {status}."),
    }))
}

pub async fn record_documents(
    State(state): State<AppState>,
    Path(job_id): Path<u64>,
    Json(payload): Json<DocumentsRequest>,
) -> Result<Json<Acknowledgement>, AppError> {
    let kinds: Vec<DocumentKind> = [
        (payload.resume, DocumentKind::Resume),
        (payload.cover_letter, DocumentKind::CoverLetter),
    ]
    .into_iter()
    .filter_map(|(wanted, kind)| wanted.then_some(kind))
    .collect();
    if kinds.is_empty() {
        return Err(AppError::bad_request(
            "at least one of resume or cover_letter must be requested",
        ));
    }

    let mut data = state.data.lock().await;
    if !data.jobs.contains_key(&job_id) {
        return Err(AppError::not_found(format!("job {job_id} not found")));
    }
    let generated_at = now();
    data.documents.extend(kinds.iter().map(|kind| DocumentGeneration {
        job_id,
        kind: *kind,
        generated_at,
    }));
    persist_data(&state.data_path, &data).await?;

    Ok(Json(Acknowledgement {
        success: format!("Recorded {} document(s) for job {job_id}.", kinds.len()),
    }))
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

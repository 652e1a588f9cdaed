use crate::errors::FetchError;
use crate::models::{Acknowledgement, DashboardStats, Quote};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

pub const STATS_PATH: &str = "/api/dashboard_stats";
pub const QUOTE_PATH: &str = "/api/quote";
pub const RESET_WEEKLY_PATH: &str = "/api/reset_weekly_progress";

/// Where the dashboard gets its numbers from.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn fetch_stats(&self) -> Result<DashboardStats, FetchError>;

    async fn fetch_quote(&self) -> Result<Quote, FetchError>;

    async fn reset_weekly_progress(&self) -> Result<(), FetchError>;
}

/// HTTP client for the tracker server's dashboard endpoints.
#[derive(Clone)]
pub struct StatsClient {
    client: Client,
    base_url: String,
}

impl StatsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Moves a job to a new status. Callers that care about the dashboard
    /// should raise a refresh signal afterwards.
    pub async fn update_job_status(&self, job_id: u64, status: &str) -> Result<Acknowledgement, FetchError> {
        let body = serde_json::json!({ "status": status });
        self.post_json(&format!("/api/jobs/{job_id}/status"), &body).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        debug!(path, "GET");
        let response = self.client.get(self.url(path)).send().await?;
        decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, FetchError> {
        debug!(path, "POST");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FetchError> {
    if !response.status().is_success() {
        return Err(FetchError::from_response(response).await);
    }
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

#[async_trait]
impl DashboardSource for StatsClient {
    async fn fetch_stats(&self) -> Result<DashboardStats, FetchError> {
        self.get_json(STATS_PATH).await
    }

    async fn fetch_quote(&self) -> Result<Quote, FetchError> {
        self.get_json(QUOTE_PATH).await
    }

    async fn reset_weekly_progress(&self) -> Result<(), FetchError> {
        let _: Acknowledgement = self.post_json(RESET_WEEKLY_PATH, &serde_json::json!({})).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn decodes_partial_stats_payload() {
        let base = serve(Router::new().route(
            STATS_PATH,
            get(|| async { r#"{"applications_today": 2, "applications_by_source": {"linkedin": 2}}"# }),
        ))
        .await;

        let stats = StatsClient::new(base).fetch_stats().await.unwrap();
        assert_eq!(stats.applications_today, 2);
        assert_eq!(stats.total_applications, 0);
        assert_eq!(stats.applications_by_source.get("linkedin"), Some(&2));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let base = serve(Router::new().route(QUOTE_PATH, get(|| async { "<html>oops</html>" }))).await;

        let err = StatsClient::new(base).fetch_quote().await.unwrap_err();
        assert!(err.is_decode(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn non_success_status_is_a_network_error() {
        let base = serve(Router::new().route(
            STATS_PATH,
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        ))
        .await;

        match StatsClient::new(base).fetch_stats().await.unwrap_err() {
            FetchError::Status { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = StatsClient::new(format!("http://127.0.0.1:{port}"))
            .fetch_stats()
            .await
            .unwrap_err();
        assert!(err.is_network());
        assert!(!err.is_decode());
    }
}

use job_dashboard::{load_data, router, AppState, ServerSettings};
use std::net::SocketAddr;
use tokio::fs;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let settings = ServerSettings::from_env()?;
    if let Some(parent) = settings.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let data = load_data(&settings.data_path).await;
    info!(
        jobs = data.jobs.len(),
        daily_goal = settings.goals.daily_goal,
        weekly_goal = settings.goals.weekly_goal,
        "loaded tracker from {}",
        settings.data_path.display()
    );
    let app = router(AppState::new(settings.data_path, settings.goals, data));

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutting down"),
        Err(err) => {
            error!("cannot listen for shutdown signal: {err}");
            std::future::pending::<()>().await
        }
    }
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use job_dashboard::config::{DEFAULT_DAILY_GOAL, DEFAULT_WEEKLY_GOAL};
use job_dashboard::dashboard::{
    CycleReport, CycleState, DashboardController, RefreshSignal, StatsClient, TerminalView,
    TextChartBackend,
};
use job_dashboard::GoalConfig;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const SIGNAL_POLL: Duration = Duration::from_secs(1);

type TerminalDashboard = DashboardController<StatsClient, TextChartBackend, TerminalView>;

fn parse_interval(s: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .map_err(|_| "Invalid refresh interval".to_string())
        .and_then(|v| {
            if v > 0.0 && v <= 3600.0 {
                Ok(v)
            } else {
                Err("Refresh interval must be between 0 and 3600 seconds".to_string())
            }
        })
}

#[derive(Parser, Debug)]
#[command(name = "dashboard_watch")]
#[command(about = "Terminal view of the job application dashboard")]
#[command(version)]
struct Cli {
    /// Base URL of the tracker server
    #[arg(long, env = "DASHBOARD_URL", default_value = "http://127.0.0.1:8080")]
    url: String,

    /// Marker file shared with other tools to request a dashboard refresh
    #[arg(long, env = "DASHBOARD_SIGNAL_PATH")]
    signal_path: Option<PathBuf>,

    #[arg(long, env = "DAILY_GOAL", default_value_t = DEFAULT_DAILY_GOAL, allow_hyphen_values = true)]
    daily_goal: i64,

    #[arg(long, env = "WEEKLY_GOAL", default_value_t = DEFAULT_WEEKLY_GOAL, allow_hyphen_values = true)]
    weekly_goal: i64,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the dashboard, optionally refreshing on an interval (default)
    Watch {
        /// Seconds between refreshes; render once when omitted
        #[arg(short, long, value_parser = parse_interval)]
        interval: Option<f64>,
    },

    /// Move a job to a new status and flag the dashboard as stale
    SetStatus { job_id: u64, status: String },

    /// Restart this week's application count and re-render
    ResetWeek,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let client = StatsClient::new(cli.url.clone());
    let signal = match cli.signal_path {
        Some(path) => RefreshSignal::new(path),
        None => RefreshSignal::for_session(&session_name()),
    };
    let goals = GoalConfig::new(cli.daily_goal, cli.weekly_goal);

    match cli.command.unwrap_or(Command::Watch { interval: None }) {
        Command::Watch { interval } => {
            let controller = DashboardController::new(
                client,
                TextChartBackend::default(),
                TerminalView::default(),
                goals,
            );
            watch(controller, &signal, interval, shutdown_requested()).await
        }
        Command::SetStatus { job_id, status } => {
            let ack = client
                .update_job_status(job_id, &status)
                .await
                .with_context(|| format!("failed to update job {job_id}"))?;
            signal
                .signal_refresh_needed()
                .await
                .with_context(|| format!("failed to write {}", signal.path().display()))?;
            println!("{}", ack.success);
            Ok(())
        }
        Command::ResetWeek => {
            let mut controller = DashboardController::new(
                client,
                TextChartBackend::default(),
                TerminalView::default(),
                goals,
            );
            let report = controller
                .reset_weekly_progress()
                .await
                .context("failed to reset weekly progress")?;
            print_frame(&controller, &report);
            Ok(())
        }
    }
}

async fn shutdown_requested() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
}

/// Renders once, then keeps refreshing until `shutdown` resolves. The shutdown
/// future lives across iterations so a request made mid-refresh is still seen.
async fn watch(
    mut controller: TerminalDashboard,
    signal: &RefreshSignal,
    interval: Option<f64>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let report = controller.load(signal).await;
    print_frame(&controller, &report);

    let Some(seconds) = interval else {
        return Ok(());
    };

    let mut refresh_tick = tokio::time::interval(Duration::from_secs_f64(seconds));
    refresh_tick.tick().await;
    let mut signal_tick = tokio::time::interval(SIGNAL_POLL);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = refresh_tick.tick() => {
                let report = controller.refresh().await;
                print_frame(&controller, &report);
            }
            _ = signal_tick.tick() => {
                if let Some(report) = controller.refresh_if_signalled(signal).await {
                    print_frame(&controller, &report);
                }
            }
            _ = &mut shutdown => {
                info!("stopping dashboard watch");
                return Ok(());
            }
        }
    }
}

fn print_frame(controller: &TerminalDashboard, report: &CycleReport) {
    println!("{}", controller.view().frame(controller.charts()));
    match report.state {
        CycleState::Failed => println!("(statistics unavailable, showing placeholders)"),
        CycleState::PartiallyFailed => println!("(quote unavailable)"),
        _ => {}
    }
}

fn session_name() -> String {
    std::env::var("USER").unwrap_or_else(|_| "default".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn dead_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}")
    }

    fn controller() -> TerminalDashboard {
        DashboardController::new(
            StatsClient::new(dead_url()),
            TextChartBackend::default(),
            TerminalView::default(),
            GoalConfig::default(),
        )
    }

    #[test]
    fn interval_must_be_positive_and_bounded() {
        assert_eq!(parse_interval("2.5"), Ok(2.5));
        assert!(parse_interval("0").is_err());
        assert!(parse_interval("3601").is_err());
        assert!(parse_interval("soon").is_err());
    }

    #[tokio::test]
    async fn watch_stops_on_a_shutdown_raised_before_the_loop() {
        let signal = RefreshSignal::for_session(&format!("watch_stop_{}", std::process::id()));
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        tx.send(()).unwrap();
        let shutdown = async {
            let _ = rx.await;
        };

        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            watch(controller(), &signal, Some(0.05), shutdown),
        )
        .await;
        assert!(matches!(finished, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn watch_keeps_a_shutdown_raised_while_refreshing() {
        let signal = RefreshSignal::for_session(&format!("watch_mid_{}", std::process::id()));
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let sender = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(120)).await;
            let _ = tx.send(());
        });
        let shutdown = async {
            let _ = rx.await;
        };

        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            watch(controller(), &signal, Some(0.01), shutdown),
        )
        .await;
        sender.await.unwrap();
        assert!(matches!(finished, Ok(Ok(()))));
    }
}

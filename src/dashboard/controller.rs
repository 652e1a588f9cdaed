use super::charts::{ChartBackend, ChartLifecycleManager, ChartOptions, ChartSlot, Dataset};
use super::client::DashboardSource;
use super::goals::{GoalProgress, GoalProgressView, GoalTarget};
use super::refresh::RefreshSignal;
use super::view::{DashboardView, Kpis};
use crate::config::GoalConfig;
use crate::errors::FetchError;
use crate::models::{DashboardStats, Quote};
use tracing::{debug, error, info, warn};

pub const QUOTE_FALLBACK: &str = "Keep pushing, you are doing great!";
pub const QUOTE_ERROR: &str = "Stay motivated! (Error fetching quote)";
pub const STATS_ERROR: &str = "Error loading dashboard data. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Loading,
    Rendered,
    PartiallyFailed,
    Failed,
}

/// How one fetch cycle ended.
#[derive(Debug)]
pub struct CycleReport {
    pub cycle: u64,
    pub state: CycleState,
    pub stats_error: Option<FetchError>,
    pub quote_error: Option<FetchError>,
}

/// Everything derived from one stats response, built before any region is
/// touched so a cycle never mixes two responses.
struct Snapshot {
    kpis: Kpis,
    applications_today: u64,
    applications_this_week: u64,
    status: Dataset,
    source: Dataset,
    time: Dataset,
}

impl Snapshot {
    fn from_stats(stats: &DashboardStats) -> Self {
        Self {
            kpis: Kpis::from_stats(stats),
            applications_today: stats.applications_today,
            applications_this_week: stats.applications_this_week,
            status: Dataset::categorical(
                ChartSlot::Status.title(),
                stats
                    .application_status_breakdown
                    .iter()
                    .map(|(status, count)| (status.as_str(), *count)),
            ),
            source: Dataset::categorical(
                ChartSlot::Source.title(),
                stats
                    .applications_by_source
                    .iter()
                    .map(|(source, count)| (source.as_str(), *count)),
            ),
            time: Dataset::series(
                ChartSlot::Time.title(),
                stats
                    .applications_last_7_days
                    .iter()
                    .map(|day| (month_day(&day.date), day.count)),
            ),
        }
    }

    fn fallback() -> Self {
        Self::from_stats(&DashboardStats::default())
    }

    fn dataset(&mut self, slot: ChartSlot) -> Dataset {
        let dataset = match slot {
            ChartSlot::Status => &mut self.status,
            ChartSlot::Source => &mut self.source,
            ChartSlot::Time => &mut self.time,
        };
        std::mem::replace(dataset, Dataset::placeholder(slot.title()))
    }
}

/// `2024-01-05` becomes `01-05`; anything shorter is shown as is.
fn month_day(date: &str) -> String {
    date.get(5..).filter(|rest| !rest.is_empty()).unwrap_or(date).to_string()
}

fn quote_text(result: &Result<Quote, FetchError>) -> String {
    match result {
        Ok(quote) if !quote.quote.trim().is_empty() && !quote.author.trim().is_empty() => {
            format!("\"{}\" - {}", quote.quote.trim(), quote.author.trim())
        }
        Ok(_) => QUOTE_FALLBACK.to_string(),
        Err(_) => QUOTE_ERROR.to_string(),
    }
}

/// Drives one dashboard: fetches stats and the quote, then updates KPIs,
/// goal bars, charts and the quote region.
pub struct DashboardController<S, B: ChartBackend, V> {
    source: S,
    charts: ChartLifecycleManager<B>,
    goal_bars: GoalProgressView,
    view: V,
    goals: GoalConfig,
    state: CycleState,
    cycles: u64,
}

impl<S, B, V> DashboardController<S, B, V>
where
    S: DashboardSource,
    B: ChartBackend,
    V: DashboardView,
{
    pub fn new(source: S, backend: B, view: V, goals: GoalConfig) -> Self {
        Self {
            source,
            charts: ChartLifecycleManager::new(backend),
            goal_bars: GoalProgressView::default(),
            view,
            goals,
            state: CycleState::Idle,
            cycles: 0,
        }
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn charts(&self) -> &ChartLifecycleManager<B> {
        &self.charts
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn goal_bar(&self, target: GoalTarget) -> Option<&GoalProgress> {
        self.goal_bars.bar(target)
    }

    /// Initial page load. A pending refresh signal is consumed here and folded
    /// into this cycle's fetch rather than triggering a second one.
    pub async fn load(&mut self, signal: &RefreshSignal) -> CycleReport {
        match signal.consume_if_set().await {
            Ok(true) => info!("pending refresh request folded into load-time fetch"),
            Ok(false) => {}
            Err(err) => warn!("could not read refresh signal: {err}"),
        }
        self.refresh().await
    }

    /// Runs a cycle only if another process asked for one.
    pub async fn refresh_if_signalled(&mut self, signal: &RefreshSignal) -> Option<CycleReport> {
        match signal.consume_if_set().await {
            Ok(true) => Some(self.refresh().await),
            Ok(false) => None,
            Err(err) => {
                warn!("could not read refresh signal: {err}");
                None
            }
        }
    }

    pub async fn reset_weekly_progress(&mut self) -> Result<CycleReport, FetchError> {
        self.source.reset_weekly_progress().await?;
        info!("weekly progress reset, refreshing dashboard");
        Ok(self.refresh().await)
    }

    /// One full fetch cycle. Both requests go out together and each region is
    /// drawn as soon as its own response settles.
    pub async fn refresh(&mut self) -> CycleReport {
        self.cycles += 1;
        let cycle = self.cycles;
        self.state = CycleState::Loading;
        debug!(cycle, "fetch cycle started");

        let (stats_error, quote_error) = {
            let Self {
                source,
                charts,
                goal_bars,
                view,
                goals,
                ..
            } = &mut *self;

            let stats_request = source.fetch_stats();
            let quote_request = source.fetch_quote();
            tokio::pin!(stats_request, quote_request);

            let mut stats_error = None;
            let mut quote_error = None;
            let mut stats_settled = false;
            let mut quote_settled = false;

            while !(stats_settled && quote_settled) {
                tokio::select! {
                    result = &mut stats_request, if !stats_settled => {
                        stats_settled = true;
                        let snapshot = match result {
                            Ok(stats) => Snapshot::from_stats(&stats),
                            Err(err) => {
                                error!(cycle, "error fetching dashboard stats: {err}");
                                stats_error = Some(err);
                                Snapshot::fallback()
                            }
                        };
                        apply_snapshot(snapshot, charts, goal_bars, view, goals);
                        if stats_error.is_some() {
                            view.show_quote(STATS_ERROR);
                        }
                    }
                    result = &mut quote_request, if !quote_settled => {
                        quote_settled = true;
                        // A failed stats fetch owns the quote region for this cycle.
                        if stats_error.is_none() {
                            view.show_quote(&quote_text(&result));
                        }
                        if let Err(err) = result {
                            warn!(cycle, "error fetching motivational quote: {err}");
                            quote_error = Some(err);
                        }
                    }
                }
            }

            (stats_error, quote_error)
        };

        let outcome = match (&stats_error, &quote_error) {
            (Some(_), _) => CycleState::Failed,
            (None, Some(_)) => CycleState::PartiallyFailed,
            (None, None) => CycleState::Rendered,
        };
        info!(cycle, state = ?outcome, "fetch cycle finished");
        self.state = CycleState::Idle;

        CycleReport {
            cycle,
            state: outcome,
            stats_error,
            quote_error,
        }
    }
}

fn apply_snapshot<B: ChartBackend, V: DashboardView>(
    mut snapshot: Snapshot,
    charts: &mut ChartLifecycleManager<B>,
    goal_bars: &mut GoalProgressView,
    view: &mut V,
    goals: &GoalConfig,
) {
    view.show_kpis(&snapshot.kpis);

    let daily = goal_bars.update(Some(snapshot.applications_today), goals.daily_goal, GoalTarget::Daily);
    view.show_goal(daily);
    let weekly = goal_bars.update(
        Some(snapshot.applications_this_week),
        goals.weekly_goal,
        GoalTarget::Weekly,
    );
    view.show_goal(weekly);

    for slot in ChartSlot::ALL {
        let dataset = snapshot.dataset(slot);
        if let Err(err) = charts.render(slot, slot.kind(), dataset, ChartOptions::default()) {
            error!(?slot, "chart render failed: {err}");
        }
    }
}

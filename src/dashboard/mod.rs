//! Client side of the tracker: fetches statistics, keeps one live chart per
//! slot and drives the KPI, goal and quote regions of a dashboard.

pub mod charts;
pub mod client;
pub mod controller;
pub mod goals;
pub mod refresh;
pub mod terminal;
pub mod view;

pub use charts::{ChartBackend, ChartKind, ChartLifecycleManager, ChartOptions, ChartSlot, Dataset};
pub use client::{DashboardSource, StatsClient};
pub use controller::{CycleReport, CycleState, DashboardController};
pub use goals::{GoalProgress, GoalProgressView, GoalTarget, ProgressTier};
pub use refresh::RefreshSignal;
pub use terminal::{TerminalView, TextChartBackend};
pub use view::{DashboardView, Kpis};

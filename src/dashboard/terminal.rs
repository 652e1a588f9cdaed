use super::charts::{ChartBackend, ChartError, ChartKind, ChartLifecycleManager, ChartSlot, ChartSpec};
use super::goals::{GoalProgress, GoalTarget};
use super::view::{DashboardView, Kpis};
use std::collections::BTreeMap;
use std::fmt::Write as _;

const BAR_WIDTH: usize = 30;

/// A chart drawn as lines of text.
#[derive(Debug, Clone)]
pub struct TextChart {
    pub id: u64,
    pub spec: ChartSpec,
    pub lines: Vec<String>,
}

/// Draws charts into per-slot text canvases. A canvas accepts a new chart
/// only after its previous one was released.
#[derive(Debug, Default)]
pub struct TextChartBackend {
    next_id: u64,
    bound: BTreeMap<ChartSlot, u64>,
    released: u64,
}

impl TextChartBackend {
    pub fn bound_canvases(&self) -> usize {
        self.bound.len()
    }

    pub fn released(&self) -> u64 {
        self.released
    }
}

impl ChartBackend for TextChartBackend {
    type Handle = TextChart;

    fn create(&mut self, spec: ChartSpec) -> Result<TextChart, ChartError> {
        if self.bound.contains_key(&spec.slot) {
            return Err(ChartError::CanvasInUse(spec.slot));
        }
        self.next_id += 1;
        self.bound.insert(spec.slot, self.next_id);

        Ok(TextChart {
            id: self.next_id,
            lines: draw(&spec),
            spec,
        })
    }

    fn release(&mut self, handle: TextChart) {
        if self.bound.get(&handle.spec.slot) == Some(&handle.id) {
            self.bound.remove(&handle.spec.slot);
            self.released += 1;
        }
    }
}

fn draw(spec: &ChartSpec) -> Vec<String> {
    let dataset = &spec.dataset;
    let mut lines = vec![format!("{} ({:?})", spec.slot.title(), spec.kind)];

    if spec.options.show_legend {
        let legend = match spec.kind {
            ChartKind::Line => dataset.label.clone(),
            ChartKind::Pie | ChartKind::Doughnut => dataset.labels.join(" | "),
        };
        lines.push(format!("  legend: {legend}"));
    }

    if dataset.is_placeholder() {
        lines.push(format!("  {}", dataset.labels[0]));
        return lines;
    }

    let label_width = dataset.labels.iter().map(|label| label.len()).max().unwrap_or(0);
    let max = dataset.values.iter().copied().max().unwrap_or(0).max(1);
    let total = dataset.values.iter().fold(0u64, |sum, value| sum.saturating_add(*value));

    for (label, value) in dataset.labels.iter().zip(&dataset.values) {
        let bar = "#".repeat(bar_length(*value, max));
        let mut line = format!("  {label:<label_width$} |{bar:<BAR_WIDTH$} {value}");
        if matches!(spec.kind, ChartKind::Pie | ChartKind::Doughnut) && total > 0 {
            let _ = write!(line, " ({:.0}%)", *value as f64 / total as f64 * 100.0);
        }
        lines.push(line);
    }

    if let Some(ticks) = spec.options.y_axis {
        lines.push(format!("  y axis: from 0, step {}", ticks.step_size));
    }

    lines
}

/// Bar cells for `value` on a scale where `max` fills the whole width.
fn bar_length(value: u64, max: u64) -> usize {
    let cells = (u128::from(value) * BAR_WIDTH as u128).div_ceil(u128::from(max));
    cells.min(BAR_WIDTH as u128) as usize
}

/// Collects the non-chart regions for printing as one text frame.
#[derive(Debug, Default)]
pub struct TerminalView {
    kpis: Kpis,
    goals: BTreeMap<GoalTarget, GoalProgress>,
    quote: String,
}

impl TerminalView {
    pub fn quote(&self) -> &str {
        &self.quote
    }

    pub fn frame(&self, charts: &ChartLifecycleManager<TextChartBackend>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "== Job application dashboard ==");

        for (label, value) in self.kpis.entries() {
            let _ = writeln!(out, "{label:<24} {value:>6}");
        }

        let _ = writeln!(out);
        for progress in self.goals.values() {
            let filled = (progress.percentage / 100.0 * BAR_WIDTH as f64).round() as usize;
            let _ = writeln!(
                out,
                "{:<12} [{}{}] {} {}",
                progress.target.label(),
                "=".repeat(filled),
                " ".repeat(BAR_WIDTH - filled),
                progress,
                progress.tier.css_class(),
            );
        }

        for slot in ChartSlot::ALL {
            if let Some(chart) = charts.handle(slot) {
                let _ = writeln!(out);
                for line in &chart.lines {
                    let _ = writeln!(out, "{line}");
                }
            }
        }

        if !self.quote.is_empty() {
            let _ = writeln!(out, "\n{}", self.quote);
        }
        out
    }
}

impl DashboardView for TerminalView {
    fn show_kpis(&mut self, kpis: &Kpis) {
        self.kpis = *kpis;
    }

    fn show_goal(&mut self, progress: &GoalProgress) {
        self.goals.insert(progress.target, progress.clone());
    }

    fn show_quote(&mut self, text: &str) {
        self.quote = text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::charts::{ChartOptions, Dataset};
    use crate::dashboard::goals::GoalProgressView;

    #[test]
    fn canvas_refuses_second_chart_until_released() {
        let mut backend = TextChartBackend::default();
        let spec = ChartSpec::prepare(
            ChartSlot::Source,
            ChartKind::Pie,
            Dataset::categorical("Applications by Source", [("linkedin", 3)]),
            ChartOptions::default(),
        );

        let first = backend.create(spec.clone()).unwrap();
        assert_eq!(
            backend.create(spec.clone()).unwrap_err(),
            ChartError::CanvasInUse(ChartSlot::Source)
        );
        backend.release(first);
        assert!(backend.create(spec).is_ok());
        assert_eq!(backend.released(), 1);
    }

    #[test]
    fn pie_lines_show_counts_and_shares() {
        let spec = ChartSpec::prepare(
            ChartSlot::Source,
            ChartKind::Pie,
            Dataset::categorical("Applications by Source", [("indeed", 1), ("linkedin", 3)]),
            ChartOptions::default(),
        );
        let lines = draw(&spec);
        assert_eq!(lines[1], "  legend: indeed | linkedin");
        assert!(lines[2].ends_with(" 1 (25%)"));
        assert!(lines[3].ends_with(" 3 (75%)"));
    }

    #[test]
    fn huge_counts_draw_without_overflow() {
        let spec = ChartSpec::prepare(
            ChartSlot::Source,
            ChartKind::Pie,
            Dataset::categorical(
                "Applications by Source",
                [("indeed", u64::MAX / 2 + 1), ("linkedin", u64::MAX / 2 + 1)],
            ),
            ChartOptions::default(),
        );
        let lines = draw(&spec);
        assert!(lines[2].contains(&"#".repeat(BAR_WIDTH)));
        assert!(lines[2].ends_with(" (50%)"));

        let lopsided = ChartSpec::prepare(
            ChartSlot::Time,
            ChartKind::Line,
            Dataset::series("Applications per Day", [("01-01", 1u64 << 62), ("01-02", 1)]),
            ChartOptions::default(),
        );
        let lines = draw(&lopsided);
        assert!(lines[2].contains(&"#".repeat(BAR_WIDTH)));
        assert!(lines[3].contains("|# "));
    }

    #[test]
    fn bar_length_stays_within_width() {
        assert_eq!(bar_length(0, 1), 0);
        assert_eq!(bar_length(u64::MAX, u64::MAX), BAR_WIDTH);
        assert_eq!(bar_length(1, u64::MAX), 1);
        assert_eq!(bar_length(5, 10), BAR_WIDTH / 2);
    }

    #[test]
    fn real_no_data_category_shows_its_count() {
        let spec = ChartSpec::prepare(
            ChartSlot::Source,
            ChartKind::Pie,
            Dataset::categorical("Applications by Source", [("No Data", 4)]),
            ChartOptions::default(),
        );
        let lines = draw(&spec);
        assert!(lines[2].ends_with(" 4 (100%)"));
    }

    #[test]
    fn placeholder_draws_no_data_without_legend() {
        let spec = ChartSpec::prepare(
            ChartSlot::Time,
            ChartKind::Line,
            Dataset::series("Applications per Day", Vec::<(String, u64)>::new()),
            ChartOptions::default(),
        );
        let lines = draw(&spec);
        assert_eq!(lines, vec!["Applications per Day (Line)".to_string(), "  No Data".to_string()]);
    }

    #[test]
    fn frame_includes_goal_labels_and_quote() {
        let mut view = TerminalView::default();
        let mut bars = GoalProgressView::default();
        view.show_goal(bars.update(Some(5), 10, GoalTarget::Daily));
        view.show_quote("\"Onward.\" - Anon");
        let manager = ChartLifecycleManager::new(TextChartBackend::default());

        let frame = view.frame(&manager);
        assert!(frame.contains("50% (5 / 10)"));
        assert!(frame.contains("Onward."));
        assert!(frame.contains("Total applications"));
    }
}

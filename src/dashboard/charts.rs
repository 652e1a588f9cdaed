use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

pub const NO_DATA_LABEL: &str = "No Data";
pub const PLACEHOLDER_COLOR: &str = "rgba(200, 200, 200, 0.2)";
pub const LINE_COLOR: &str = "rgb(75, 192, 192)";
pub const PALETTE: [&str; 8] = [
    "rgba(255, 99, 132, 0.7)",
    "rgba(54, 162, 235, 0.7)",
    "rgba(255, 206, 86, 0.7)",
    "rgba(75, 192, 192, 0.7)",
    "rgba(153, 102, 255, 0.7)",
    "rgba(255, 159, 64, 0.7)",
    "rgba(199, 199, 199, 0.7)",
    "rgba(83, 102, 83, 0.7)",
];

/// Roughly how many ticks a count axis should carry before the step grows.
const TARGET_TICKS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartSlot {
    Status,
    Source,
    Time,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 3] = [ChartSlot::Status, ChartSlot::Source, ChartSlot::Time];

    pub fn title(&self) -> &'static str {
        match self {
            ChartSlot::Status => "Application Status",
            ChartSlot::Source => "Applications by Source",
            ChartSlot::Time => "Applications per Day",
        }
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            ChartSlot::Status => ChartKind::Doughnut,
            ChartSlot::Source => ChartKind::Pie,
            ChartSlot::Time => ChartKind::Line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Pie,
    Doughnut,
}

impl ChartKind {
    /// Line charts plot counts against a numeric y axis.
    pub fn has_value_axis(&self) -> bool {
        matches!(self, ChartKind::Line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    pub colors: Vec<String>,
    /// Set only by [`Dataset::placeholder`]; a real category may be named "No Data".
    pub placeholder: bool,
}

impl Dataset {
    /// One colour per category, cycling through the palette.
    pub fn categorical<I, L>(label: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (L, u64)>,
        L: Into<String>,
    {
        let (labels, values): (Vec<String>, Vec<u64>) = entries
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .unzip();
        let colors = (0..labels.len())
            .map(|index| PALETTE[index % PALETTE.len()].to_string())
            .collect();
        Self {
            label: label.into(),
            labels,
            values,
            colors,
            placeholder: false,
        }
    }

    /// A single-colour series, kept in input order.
    pub fn series<I, L>(label: impl Into<String>, points: I) -> Self
    where
        I: IntoIterator<Item = (L, u64)>,
        L: Into<String>,
    {
        let (labels, values) = points
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .unzip();
        Self {
            label: label.into(),
            labels,
            values,
            colors: vec![LINE_COLOR.to_string()],
            placeholder: false,
        }
    }

    pub fn placeholder(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            labels: vec![NO_DATA_LABEL.to_string()],
            values: vec![1],
            colors: vec![PLACEHOLDER_COLOR.to_string()],
            placeholder: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.values.is_empty()
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AxisTicks {
    pub begin_at_zero: bool,
    pub step_size: u64,
    pub precision: u8,
}

impl AxisTicks {
    /// Whole-number ticks for count data; the step never drops below one.
    pub fn for_counts(values: &[u64]) -> Self {
        let max = values.iter().copied().max().unwrap_or(0);
        Self {
            begin_at_zero: true,
            step_size: max.div_ceil(TARGET_TICKS).max(1),
            precision: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartOptions {
    pub show_legend: bool,
    pub y_axis: Option<AxisTicks>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            show_legend: true,
            y_axis: None,
        }
    }
}

/// Everything a backend needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    pub slot: ChartSlot,
    pub kind: ChartKind,
    pub dataset: Dataset,
    pub options: ChartOptions,
}

impl ChartSpec {
    pub fn prepare(slot: ChartSlot, kind: ChartKind, dataset: Dataset, options: ChartOptions) -> Self {
        let mut options = options;
        let dataset = if dataset.is_empty() {
            options.show_legend = false;
            Dataset::placeholder(dataset.label)
        } else {
            dataset
        };
        if kind.has_value_axis() {
            options.y_axis = Some(AxisTicks::for_counts(&dataset.values));
        }

        Self {
            slot,
            kind,
            dataset,
            options,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChartError {
    #[error("the {0:?} canvas is still bound to a live chart")]
    CanvasInUse(ChartSlot),

    #[error("chart backend failed: {0}")]
    Backend(String),
}

/// Something that can turn a [`ChartSpec`] into a live chart and tear it down.
pub trait ChartBackend {
    type Handle;

    fn create(&mut self, spec: ChartSpec) -> Result<Self::Handle, ChartError>;

    /// Frees every resource the handle owns. The handle is unusable afterwards.
    fn release(&mut self, handle: Self::Handle);
}

/// Owns at most one live chart per slot.
pub struct ChartLifecycleManager<B: ChartBackend> {
    backend: B,
    slots: BTreeMap<ChartSlot, B::Handle>,
}

impl<B: ChartBackend> ChartLifecycleManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            slots: BTreeMap::new(),
        }
    }

    /// Replaces whatever chart `slot` holds. The previous handle is released
    /// before the new chart is created, so two charts never share a canvas.
    pub fn render(
        &mut self,
        slot: ChartSlot,
        kind: ChartKind,
        dataset: Dataset,
        options: ChartOptions,
    ) -> Result<&B::Handle, ChartError> {
        let spec = ChartSpec::prepare(slot, kind, dataset, options);
        self.release(slot);

        let handle = self.backend.create(spec)?;
        Ok(self.slots.entry(slot).or_insert(handle))
    }

    pub fn handle(&self, slot: ChartSlot) -> Option<&B::Handle> {
        self.slots.get(&slot)
    }

    pub fn live_count(&self) -> usize {
        self.slots.len()
    }

    pub fn release(&mut self, slot: ChartSlot) -> bool {
        match self.slots.remove(&slot) {
            Some(handle) => {
                self.backend.release(handle);
                true
            }
            None => false,
        }
    }

    pub fn release_all(&mut self) {
        for slot in ChartSlot::ALL {
            self.release(slot);
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: ChartBackend> Drop for ChartLifecycleManager<B> {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::rc::Rc;

    #[derive(Default)]
    struct Ledger {
        live: BTreeSet<u64>,
        bound: BTreeMap<ChartSlot, u64>,
        created: u64,
    }

    /// Refuses to bind a canvas twice, the way a real canvas would misbehave.
    #[derive(Clone, Default)]
    struct StrictBackend(Rc<RefCell<Ledger>>);

    struct TestChart {
        id: u64,
        spec: ChartSpec,
    }

    impl ChartBackend for StrictBackend {
        type Handle = TestChart;

        fn create(&mut self, spec: ChartSpec) -> Result<TestChart, ChartError> {
            let mut ledger = self.0.borrow_mut();
            if ledger.bound.contains_key(&spec.slot) {
                return Err(ChartError::CanvasInUse(spec.slot));
            }
            ledger.created += 1;
            let id = ledger.created;
            ledger.live.insert(id);
            ledger.bound.insert(spec.slot, id);
            Ok(TestChart { id, spec })
        }

        fn release(&mut self, handle: TestChart) {
            let mut ledger = self.0.borrow_mut();
            ledger.live.remove(&handle.id);
            ledger.bound.remove(&handle.spec.slot);
        }
    }

    #[test]
    fn repeated_render_keeps_one_live_chart_per_slot() {
        let backend = StrictBackend::default();
        let ledger = Rc::clone(&backend.0);
        let mut manager = ChartLifecycleManager::new(backend);

        for round in 0..5u64 {
            let dataset = Dataset::categorical("Application Status", [("applied", round + 1)]);
            manager
                .render(ChartSlot::Status, ChartKind::Doughnut, dataset, ChartOptions::default())
                .unwrap();
        }

        assert_eq!(manager.live_count(), 1);
        assert_eq!(ledger.borrow().live.len(), 1);
        assert_eq!(ledger.borrow().created, 5);
        let handle = manager.handle(ChartSlot::Status).unwrap();
        assert_eq!(handle.id, 5);
        assert_eq!(handle.spec.dataset.values, vec![5]);
    }

    #[test]
    fn empty_dataset_becomes_placeholder_without_legend() {
        let mut manager = ChartLifecycleManager::new(StrictBackend::default());
        let empty = Dataset::categorical("Application Status", Vec::<(String, u64)>::new());
        let handle = manager
            .render(ChartSlot::Status, ChartKind::Doughnut, empty, ChartOptions::default())
            .unwrap();

        assert_eq!(handle.spec.dataset.labels, vec![NO_DATA_LABEL.to_string()]);
        assert_eq!(handle.spec.dataset.values, vec![1]);
        assert_eq!(handle.spec.dataset.colors, vec![PLACEHOLDER_COLOR.to_string()]);
        assert_eq!(handle.spec.dataset.label, "Application Status");
        assert!(handle.spec.dataset.is_placeholder());
        assert!(!handle.spec.options.show_legend);
    }

    #[test]
    fn category_named_no_data_is_real_data() {
        let mut manager = ChartLifecycleManager::new(StrictBackend::default());
        let dataset = Dataset::categorical("Applications by Source", [(NO_DATA_LABEL, 4)]);
        let handle = manager
            .render(ChartSlot::Source, ChartKind::Pie, dataset, ChartOptions::default())
            .unwrap();

        assert!(!handle.spec.dataset.is_placeholder());
        assert_eq!(handle.spec.dataset.values, vec![4]);
        assert!(handle.spec.options.show_legend);
    }

    #[test]
    fn line_chart_gets_integer_ticks_and_keeps_order() {
        let mut manager = ChartLifecycleManager::new(StrictBackend::default());
        let series = Dataset::series("Applications per Day", [("01-01", 3), ("01-02", 0)]);
        let handle = manager
            .render(ChartSlot::Time, ChartKind::Line, series, ChartOptions::default())
            .unwrap();

        let ticks = handle.spec.options.y_axis.unwrap();
        assert!(ticks.begin_at_zero);
        assert_eq!(ticks.step_size, 1);
        assert_eq!(ticks.precision, 0);
        assert_eq!(handle.spec.dataset.labels, vec!["01-01", "01-02"]);
        assert_eq!(handle.spec.dataset.values, vec![3, 0]);
    }

    #[test]
    fn tick_step_grows_with_large_counts() {
        assert_eq!(AxisTicks::for_counts(&[]).step_size, 1);
        assert_eq!(AxisTicks::for_counts(&[10]).step_size, 1);
        assert_eq!(AxisTicks::for_counts(&[11]).step_size, 2);
        assert_eq!(AxisTicks::for_counts(&[95, 3]).step_size, 10);
    }

    #[test]
    fn palette_cycles_past_eight_categories() {
        let dataset = Dataset::categorical("x", (0..10u64).map(|index| (format!("s{index}"), index)));
        assert_eq!(dataset.colors.len(), 10);
        assert_eq!(dataset.colors[8], PALETTE[0]);
    }

    #[test]
    fn dropping_manager_releases_every_slot() {
        let backend = StrictBackend::default();
        let ledger = Rc::clone(&backend.0);
        {
            let mut manager = ChartLifecycleManager::new(backend);
            for slot in ChartSlot::ALL {
                manager
                    .render(slot, slot.kind(), Dataset::placeholder(slot.title()), ChartOptions::default())
                    .unwrap();
            }
            assert_eq!(ledger.borrow().live.len(), 3);
        }
        assert!(ledger.borrow().live.is_empty());
    }
}

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GoalTarget {
    Daily,
    Weekly,
}

impl GoalTarget {
    pub fn label(&self) -> &'static str {
        match self {
            GoalTarget::Daily => "Daily goal",
            GoalTarget::Weekly => "Weekly goal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTier {
    Complete,
    High,
    Medium,
    Low,
    /// No usable goal configured.
    Disabled,
}

impl ProgressTier {
    pub fn css_class(&self) -> &'static str {
        match self {
            ProgressTier::Complete => "bg-success",
            ProgressTier::High => "bg-primary",
            ProgressTier::Medium => "bg-warning",
            ProgressTier::Low => "bg-info",
            ProgressTier::Disabled => "bg-secondary",
        }
    }
}

/// Percentage cut points for the coloured tiers. Anything at or above 100 is
/// always complete.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            high: 75.0,
            medium: 50.0,
        }
    }
}

impl TierThresholds {
    pub fn tier_for(&self, percentage: f64) -> ProgressTier {
        if percentage >= 100.0 {
            ProgressTier::Complete
        } else if percentage >= self.high {
            ProgressTier::High
        } else if percentage >= self.medium {
            ProgressTier::Medium
        } else {
            ProgressTier::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    pub target: GoalTarget,
    pub current: u64,
    pub goal: i64,
    /// Clamped to `0..=100`.
    pub percentage: f64,
    pub tier: ProgressTier,
}

impl GoalProgress {
    pub fn rounded_percentage(&self) -> u64 {
        self.percentage.round() as u64
    }

    pub fn counts_label(&self) -> String {
        format!("{} / {}", self.current, self.goal)
    }
}

impl fmt::Display for GoalProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% ({})", self.rounded_percentage(), self.counts_label())
    }
}

#[derive(Debug, Default)]
pub struct GoalProgressView {
    thresholds: TierThresholds,
    bars: BTreeMap<GoalTarget, GoalProgress>,
}

impl GoalProgressView {
    pub fn new(thresholds: TierThresholds) -> Self {
        Self {
            thresholds,
            bars: BTreeMap::new(),
        }
    }

    pub fn update(&mut self, current: Option<u64>, goal: i64, target: GoalTarget) -> &GoalProgress {
        let current = current.unwrap_or(0);
        let (percentage, tier) = if goal > 0 {
            let percentage = (current as f64 / goal as f64 * 100.0).min(100.0);
            (percentage, self.thresholds.tier_for(percentage))
        } else {
            (0.0, ProgressTier::Disabled)
        };

        let progress = GoalProgress {
            target,
            current,
            goal,
            percentage,
            tier,
        };
        self.bars.insert(target, progress);
        &self.bars[&target]
    }

    pub fn bar(&self, target: GoalTarget) -> Option<&GoalProgress> {
        self.bars.get(&target)
    }
}

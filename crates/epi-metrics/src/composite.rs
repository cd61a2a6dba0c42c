// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::evaluator::MetricEvaluator;
use crate::format::ValueFormat;
use epi_core::{EvalContext, RegionLevel, Snapshot, SnapshotMetric};

/// How a composite combines its children into one value.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combiner {
    /// Sum of all child values (stacked series).
    Sum,
    /// First child over the sum of all children; zero when the sum is
    /// zero. This is how a percent-positive metric is built from positive
    /// and negative test-count evaluators.
    Quotient,
}

/// An ordered list of evaluators presented as one logical metric.
///
/// Scalar metadata reads delegate to the first child; bulk writes go
/// through to every child so the family stays consistent.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct CompositeEvaluator {
    pub title: String,
    pub noun: String,
    pub children: Vec<MetricEvaluator>,
    pub combiner: Combiner,
    pub normalized: bool,
    pub smoothed: bool,
    pub display: bool,
    pub up_is_better: bool,
    /// Overrides the delegated default when set.
    pub value_format: Option<ValueFormat>,
    pub benchmark: Option<Box<Metric>>,
    pub benchmark_level: RegionLevel,
    pub supported_level: RegionLevel,
}

impl CompositeEvaluator {
    /// A composite over `children`; callers configure title and noun via
    /// the public fields. `children` must be non-empty for the delegating
    /// reads to be meaningful.
    pub fn new(children: Vec<MetricEvaluator>, combiner: Combiner, normalized: bool) -> Self {
        debug_assert!(
            !children.is_empty(),
            "composite evaluators delegate to their first child"
        );
        Self {
            title: String::new(),
            noun: String::new(),
            children,
            combiner,
            normalized,
            smoothed: false,
            display: true,
            up_is_better: false,
            value_format: None,
            benchmark: None,
            benchmark_level: RegionLevel::Nation,
            supported_level: RegionLevel::State,
        }
    }

    pub fn num_series(&self) -> usize {
        self.children.len()
    }

    /// The first (primary) child, which single-series behavior delegates
    /// to.
    pub fn primary(&self) -> &MetricEvaluator {
        &self.children[0]
    }

    pub fn value_for_snapshot(&self, snapshot: &Snapshot, ctx: &EvalContext<'_>) -> f64 {
        let sum: f64 = self
            .children
            .iter()
            .map(|child| child.value_for_snapshot(snapshot, ctx))
            .sum();
        match self.combiner {
            Combiner::Sum => sum,
            Combiner::Quotient => {
                if sum == 0.0 {
                    0.0
                } else {
                    self.primary().value_for_snapshot(snapshot, ctx) / sum
                }
            }
        }
    }

    pub fn measure_delta(&self) -> bool {
        self.primary().measure_delta
    }

    /// Writes through to every child.
    pub fn set_measure_delta(&mut self, measure_delta: bool) {
        for child in &mut self.children {
            child.measure_delta = measure_delta;
        }
    }

    pub fn allow_negative(&self) -> bool {
        self.primary().allow_negative
    }

    pub fn set_allow_negative(&mut self, allow_negative: bool) {
        for child in &mut self.children {
            child.allow_negative = allow_negative;
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.primary().source.as_deref()
    }

    pub fn set_source(&mut self, source: Option<String>) {
        for child in &mut self.children {
            child.source = source.clone();
        }
    }

    /// Toggles every child independently and rewraps; the composite itself
    /// carries no toggle state beyond what its children hold.
    pub fn toggled(&self) -> Self {
        let mut next = self.clone();
        next.children = self.children.iter().map(MetricEvaluator::toggled).collect();
        next
    }

    /// A copy with every child smoothed.
    pub fn smoothed_copy(&self) -> Self {
        let mut next = self.clone();
        next.children = self
            .children
            .iter()
            .map(MetricEvaluator::smoothed_copy)
            .collect();
        next.smoothed = true;
        next
    }

    pub fn stat_description(&self) -> String {
        self.primary().stat_description()
    }

    pub fn graphed_noun(&self) -> String {
        self.primary().graphed_noun(true)
    }

    pub fn change_in_graphed_noun(&self) -> String {
        self.primary()
            .change_in_graphed_noun(Some(!self.normalized))
    }

    pub fn data_is_atomic(&self) -> bool {
        !self.normalized
    }

    pub fn reporting_verb(&self) -> &'static str {
        self.primary().reporting_verb()
    }

    pub fn filter(&self) -> Option<crate::evaluator::FilterRule> {
        self.primary().filter
    }

    pub fn format_value(&self, value: f64) -> String {
        self.value_format
            .unwrap_or(ValueFormat::Count)
            .format(value)
    }

    /// Concatenated child identity; two composites are the same logical
    /// metric iff this string matches.
    pub fn hash_string(&self) -> String {
        let mut result = String::new();
        for child in &self.children {
            result.push_str(&child.hash_string());
            result.push('-');
        }
        result
    }

    pub fn equals(&self, other: &Self) -> bool {
        self.hash_string() == other.hash_string()
    }

    pub fn supports_region_level(&self, level: RegionLevel) -> bool {
        level <= self.supported_level
    }
}

impl SnapshotMetric for CompositeEvaluator {
    fn value_for_snapshot(&self, snapshot: &Snapshot, ctx: &EvalContext<'_>) -> f64 {
        CompositeEvaluator::value_for_snapshot(self, snapshot, ctx)
    }
}

/// Either evaluator shape, for slots that accept both (chart bindings,
/// benchmarks).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub enum Metric {
    Single(MetricEvaluator),
    Composite(CompositeEvaluator),
}

impl Metric {
    /// The ordered single-series evaluators behind this metric.
    pub fn metric_evaluators(&self) -> &[MetricEvaluator] {
        match self {
            Self::Single(evaluator) => std::slice::from_ref(evaluator),
            Self::Composite(composite) => &composite.children,
        }
    }

    pub fn value_for_snapshot(&self, snapshot: &Snapshot, ctx: &EvalContext<'_>) -> f64 {
        match self {
            Self::Single(evaluator) => evaluator.value_for_snapshot(snapshot, ctx),
            Self::Composite(composite) => composite.value_for_snapshot(snapshot, ctx),
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Single(evaluator) => Self::Single(evaluator.toggled()),
            Self::Composite(composite) => Self::Composite(composite.toggled()),
        }
    }

    pub fn smoothed_copy(&self) -> Self {
        match self {
            Self::Single(evaluator) => Self::Single(evaluator.smoothed_copy()),
            Self::Composite(composite) => Self::Composite(composite.smoothed_copy()),
        }
    }

    pub fn hash_string(&self) -> String {
        match self {
            Self::Single(evaluator) => evaluator.hash_string(),
            Self::Composite(composite) => composite.hash_string(),
        }
    }

    pub fn measure_delta(&self) -> bool {
        match self {
            Self::Single(evaluator) => evaluator.measure_delta,
            Self::Composite(composite) => composite.measure_delta(),
        }
    }

    pub fn allow_negative(&self) -> bool {
        match self {
            Self::Single(evaluator) => evaluator.allow_negative,
            Self::Composite(composite) => composite.allow_negative(),
        }
    }

    pub fn up_is_better(&self) -> bool {
        match self {
            Self::Single(evaluator) => evaluator.up_is_better,
            Self::Composite(composite) => composite.up_is_better,
        }
    }

    pub fn format_value(&self, value: f64) -> String {
        match self {
            Self::Single(evaluator) => evaluator.format_value(value),
            Self::Composite(composite) => composite.format_value(value),
        }
    }

    pub fn supports_region_level(&self, level: RegionLevel) -> bool {
        match self {
            Self::Single(evaluator) => evaluator.supports_region_level(level),
            Self::Composite(composite) => composite.supports_region_level(level),
        }
    }
}

impl SnapshotMetric for Metric {
    fn value_for_snapshot(&self, snapshot: &Snapshot, ctx: &EvalContext<'_>) -> f64 {
        Metric::value_for_snapshot(self, snapshot, ctx)
    }
}

impl From<MetricEvaluator> for Metric {
    fn from(evaluator: MetricEvaluator) -> Self {
        Self::Single(evaluator)
    }
}

impl From<CompositeEvaluator> for Metric {
    fn from(composite: CompositeEvaluator) -> Self {
        Self::Composite(composite)
    }
}

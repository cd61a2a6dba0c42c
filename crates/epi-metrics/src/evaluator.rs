// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::color::{CASE_DATA_COLOR, Rgb, Rgba, TEST_DATA_COLOR};
use crate::composite::Metric;
use crate::format::ValueFormat;
use crate::mobility::category_adjective;
use epi_core::{
    EvalContext, InfectionField, MobilityCategory, RegionLevel, Snapshot, SnapshotMetric, StatKind,
};

/// Where an evaluator's raw stat comes from.
///
/// Observation-backed sources go through delta/smoothing slot selection;
/// trend sources compute a raw scalar directly.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatSource {
    /// A field of the day's infection record.
    Infection(InfectionField),
    /// The mobility category selected by the evaluator's toggle count.
    Mobility,
    /// `current / prior − 1` over the smoothed slot of a field, `days`
    /// apart. `delta` picks the change slot, matching the base metric this
    /// trend was derived from.
    Trend {
        field: InfectionField,
        delta: bool,
        days: u32,
    },
    /// Difference between the day's and the prior day's smoothed daily
    /// positive rates, `days` apart.
    PositiveRateTrend { days: u32 },
}

/// What toggling does to an evaluator.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToggleStrategy {
    /// Flip between daily and cumulative measurement.
    #[default]
    FlipDelta,
    /// Cycle through the mobility categories; the active category is
    /// `toggle_count mod 5` and nothing else changes.
    CycleCategories,
}

/// Verb used when narrating the metric.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerbStyle {
    #[default]
    Reported,
    CameBackPositive,
}

/// Snapshot predicates a metric can require before ranking regions.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterRule {
    /// The day reports a positive hospitalization count.
    PositiveHospitalization,
    /// The day reports total tests at all.
    HasTotalTests,
    /// The day reports positive test results at all.
    HasTestedPositive,
}

impl FilterRule {
    pub fn accepts(self, snapshot: &Snapshot) -> bool {
        match self {
            Self::PositiveHospitalization => snapshot
                .infection
                .hospitalized
                .is_some_and(|obs| obs.value() > 0.0),
            Self::HasTotalTests => snapshot.infection.total_tests.is_some(),
            Self::HasTestedPositive => snapshot.infection.tested_positive.is_some(),
        }
    }
}

/// Anchor policy for a series annotation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnnotationPlacement {
    /// Seven points back from the end, clamped into range.
    #[default]
    WeekAgo,
    /// At the series' own maximum absolute value.
    AtDataMax,
}

/// Label attached to a rendered series.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    pub text: String,
    pub placement: AnnotationPlacement,
}

/// Parameters of the log heat-map intensity/color mapping.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntensityParams {
    pub max_power_of_ten: f64,
    pub min_alpha: f64,
    pub max_alpha: f64,
    pub base_color: Rgb,
    pub negative_color: Rgb,
}

impl Default for IntensityParams {
    fn default() -> Self {
        Self {
            max_power_of_ten: 5.0,
            min_alpha: 0.15,
            max_alpha: 1.0,
            base_color: Rgb::new(0, 0, 0),
            negative_color: Rgb::new(0, 200, 0),
        }
    }
}

/// A configured rule for extracting, transforming, formatting and coloring
/// one metric from a snapshot.
///
/// Evaluators are value objects: factories build them fully configured,
/// variants are functional updates, and toggling returns a new evaluator.
/// Two charts holding copies of the same metric family never observe each
/// other's toggle state.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct MetricEvaluator {
    pub title: String,
    pub noun: String,
    pub noun_with_number: Option<String>,
    pub delta_adjective: String,
    pub cumulative_adjective: String,
    pub source: Option<String>,
    pub stat: StatSource,
    pub measure_delta: bool,
    pub smoothed: bool,
    pub per_capita: bool,
    pub allow_negative: bool,
    pub display_as_percent: bool,
    pub normalized: bool,
    pub display: bool,
    pub up_is_better: bool,
    pub wants_fill: bool,
    pub toggle_count: u32,
    pub toggle_strategy: ToggleStrategy,
    pub verb_style: VerbStyle,
    pub value_format: ValueFormat,
    /// Wrap formatted values in a good/bad colored span (trend cells).
    pub directional_html: bool,
    pub filter: Option<FilterRule>,
    pub intensity: IntensityParams,
    pub annotation: Option<Annotation>,
    pub benchmark: Option<Box<Metric>>,
    pub benchmark_level: RegionLevel,
    pub supported_level: RegionLevel,
}

impl MetricEvaluator {
    pub fn new(title: impl Into<String>, noun: impl Into<String>, stat: StatSource) -> Self {
        Self {
            title: title.into(),
            noun: noun.into(),
            noun_with_number: None,
            delta_adjective: "new".to_string(),
            cumulative_adjective: "total".to_string(),
            source: None,
            stat,
            measure_delta: false,
            smoothed: false,
            per_capita: false,
            allow_negative: false,
            display_as_percent: false,
            normalized: false,
            display: true,
            up_is_better: false,
            wants_fill: true,
            toggle_count: 0,
            toggle_strategy: ToggleStrategy::FlipDelta,
            verb_style: VerbStyle::Reported,
            value_format: ValueFormat::Count,
            directional_html: false,
            filter: None,
            intensity: IntensityParams::default(),
            annotation: None,
            benchmark: None,
            benchmark_level: RegionLevel::Nation,
            supported_level: RegionLevel::State,
        }
    }

    /// The observation slot selected by the delta/smoothing flags.
    pub fn stat_kind(&self) -> StatKind {
        StatKind::for_transforms(self.measure_delta, self.smoothed)
    }

    /// Mobility category under [`ToggleStrategy::CycleCategories`].
    pub fn mobility_category(&self) -> MobilityCategory {
        MobilityCategory::from_index(self.toggle_count as usize)
    }

    /// The displayable value for a snapshot. Missing stats evaluate to
    /// zero; per-capita division by an unknown population evaluates to
    /// zero rather than minting an infinity.
    pub fn value_for_snapshot(&self, snapshot: &Snapshot, ctx: &EvalContext<'_>) -> f64 {
        let Some(value) = self.resolve_stat(snapshot, ctx) else {
            return 0.0;
        };
        if self.per_capita {
            let population = snapshot.region.population;
            if population == 0 {
                return 0.0;
            }
            return value / population as f64;
        }
        value
    }

    fn resolve_stat(&self, snapshot: &Snapshot, ctx: &EvalContext<'_>) -> Option<f64> {
        match self.stat {
            StatSource::Infection(field) => snapshot
                .infection
                .stat(field)
                .map(|obs| obs.get(self.stat_kind())),
            StatSource::Mobility => snapshot
                .mobility
                .as_ref()?
                .stat(self.mobility_category())
                .map(|obs| obs.get(self.stat_kind())),
            StatSource::Trend { field, delta, days } => {
                Some(trend_value(field, delta, days, snapshot, ctx))
            }
            StatSource::PositiveRateTrend { days } => {
                Some(positive_rate_trend_value(days, snapshot, ctx))
            }
        }
    }

    /// Log heat-map intensity in `[-1, 1]`. Magnitudes below one map to
    /// zero (the logarithm never goes negative), sign follows the value.
    pub fn intensity_for_snapshot(&self, snapshot: &Snapshot, ctx: &EvalContext<'_>) -> f64 {
        let value = self.value_for_snapshot(snapshot, ctx);
        if value == 0.0 {
            return 0.0;
        }
        let applied_log = value.abs().log10().max(0.0);
        if applied_log == 0.0 {
            return 0.0;
        }
        let magnitude = (applied_log + 0.1) / self.intensity.max_power_of_ten;
        let signed = if value < 0.0 { -magnitude } else { magnitude };
        signed.clamp(-1.0, 1.0)
    }

    /// Alpha interpolates `min_alpha..max_alpha` by `|intensity|`; hue
    /// switches to the negative base color below zero.
    pub fn color_for_intensity(&self, intensity: f64) -> Rgba {
        let params = &self.intensity;
        let alpha = params.min_alpha + (params.max_alpha - params.min_alpha) * intensity.abs();
        let rgb = if intensity >= 0.0 {
            params.base_color
        } else {
            params.negative_color
        };
        rgb.with_alpha(alpha)
    }

    pub fn color_for_snapshot(&self, snapshot: &Snapshot, ctx: &EvalContext<'_>) -> Rgba {
        self.color_for_intensity(self.intensity_for_snapshot(snapshot, ctx))
    }

    pub fn base_color(&self, alpha: f64) -> Rgba {
        self.intensity.base_color.with_alpha(alpha)
    }

    /// A copy with the toggle applied. The receiver is untouched.
    pub fn toggled(&self) -> Self {
        let mut next = self.clone();
        next.toggle_count += 1;
        match self.toggle_strategy {
            ToggleStrategy::FlipDelta => next.measure_delta = !next.measure_delta,
            ToggleStrategy::CycleCategories => {}
        }
        next
    }

    /// A copy reading the rolling-average slots.
    pub fn smoothed_copy(&self) -> Self {
        let mut next = self.clone();
        next.smoothed = true;
        next
    }

    /// Percent change of this metric between two snapshots.
    ///
    /// The sign of the result always matches the sign of the raw
    /// difference, including under a negative baseline; a zero baseline
    /// reads as zero change, and a missing baseline snapshot reads as a
    /// whole unit in the direction of the current value.
    pub fn percent_change_from_snapshot(
        &self,
        old: Option<&Snapshot>,
        current: &Snapshot,
        ctx: &EvalContext<'_>,
    ) -> f64 {
        let current_value = self.value_for_snapshot(current, ctx);
        let Some(old) = old else {
            return js_sign(current_value);
        };
        let old_value = self.value_for_snapshot(old, ctx);
        if old_value == 0.0 {
            return 0.0;
        }
        let difference = current_value - old_value;
        let result = difference / old_value;
        if js_sign(result) != js_sign(difference) {
            -result
        } else {
            result
        }
    }

    /// Raw difference of this metric between two snapshots.
    pub fn amount_change_from_snapshot(
        &self,
        old: Option<&Snapshot>,
        current: &Snapshot,
        ctx: &EvalContext<'_>,
    ) -> f64 {
        let Some(old) = old else {
            return 0.0;
        };
        self.value_for_snapshot(current, ctx) - self.value_for_snapshot(old, ctx)
    }

    /// Adjective describing the current display variant.
    pub fn stat_description(&self) -> String {
        match self.toggle_strategy {
            ToggleStrategy::CycleCategories => {
                category_adjective(self.mobility_category()).to_string()
            }
            ToggleStrategy::FlipDelta => {
                if self.measure_delta {
                    self.delta_adjective.clone()
                } else {
                    self.cumulative_adjective.clone()
                }
            }
        }
    }

    pub fn smoothed_noun_suffix(&self) -> &'static str {
        if self.smoothed { " (avg)" } else { "" }
    }

    /// Noun shown alongside graphed values.
    pub fn graphed_noun(&self, include_suffix: bool) -> String {
        let base = self.noun_with_number.as_deref().unwrap_or(&self.noun);
        let suffix = if include_suffix {
            self.smoothed_noun_suffix()
        } else {
            ""
        };
        format!("{base}{suffix}")
    }

    /// True when values are plain counts rather than rates or indices.
    pub fn data_is_atomic(&self) -> bool {
        !self.normalized && !self.display_as_percent
    }

    /// Axis label for the change view; atomic daily counts read per day.
    pub fn change_in_graphed_noun(&self, treat_as_atomic: Option<bool>) -> String {
        let atomic = treat_as_atomic.unwrap_or_else(|| self.data_is_atomic());
        let delta = if self.measure_delta && atomic {
            " / day"
        } else {
            ""
        };
        format!("{}{delta}", self.graphed_noun(false))
    }

    pub fn fully_qualified_noun(&self) -> String {
        match self.toggle_strategy {
            ToggleStrategy::CycleCategories => {
                format!(
                    "{} visits",
                    category_adjective(self.mobility_category()).to_lowercase()
                )
            }
            ToggleStrategy::FlipDelta => format!("{} {}", self.stat_description(), self.noun),
        }
    }

    pub fn reporting_verb(&self) -> &'static str {
        match (self.verb_style, self.measure_delta) {
            (VerbStyle::Reported, true) => "reported",
            (VerbStyle::Reported, false) => "has reported",
            (VerbStyle::CameBackPositive, true) => "came back positive",
            (VerbStyle::CameBackPositive, false) => "have come back positive",
        }
    }

    pub fn format_value(&self, value: f64) -> String {
        self.value_format.format(value)
    }

    /// Formatted value as an HTML fragment; directional metrics color the
    /// text by whether the movement is good or bad for this metric.
    pub fn format_value_html(&self, value: f64) -> String {
        let text = self.format_value(value);
        if !self.directional_html || value == 0.0 {
            return text;
        }
        let mut is_bad = value > 0.0;
        if self.up_is_better {
            is_bad = !is_bad;
        }
        let rgb = if is_bad { CASE_DATA_COLOR } else { TEST_DATA_COLOR };
        format!(
            "<span style='color:rgb({},{},{})'>{text}</span>",
            rgb.r, rgb.g, rgb.b
        )
    }

    /// Ceiling check against the metric's finest supported granularity.
    pub fn supports_region_level(&self, level: RegionLevel) -> bool {
        level <= self.supported_level
    }

    /// Stable identity key; evaluators with equal keys are the same
    /// logical metric.
    pub fn hash_string(&self) -> String {
        hash_title(&self.title)
    }

    pub fn equals(&self, other: &Self) -> bool {
        self.hash_string() == other.hash_string()
    }
}

impl SnapshotMetric for MetricEvaluator {
    fn value_for_snapshot(&self, snapshot: &Snapshot, ctx: &EvalContext<'_>) -> f64 {
        MetricEvaluator::value_for_snapshot(self, snapshot, ctx)
    }
}

fn trend_value(
    field: InfectionField,
    delta: bool,
    days: u32,
    snapshot: &Snapshot,
    ctx: &EvalContext<'_>,
) -> f64 {
    let Some(series) = ctx.series else {
        return 0.0;
    };
    let Some(prior_snapshot) = series.snapshot_preceding(snapshot, days) else {
        return 0.0;
    };
    let (Some(prior), Some(current)) = (
        prior_snapshot.infection.stat(field),
        snapshot.infection.stat(field),
    ) else {
        return 0.0;
    };

    let kind = StatKind::for_transforms(delta, true);
    let prior_value = prior.get(kind);
    if prior_value == 0.0 {
        return 0.0;
    }
    current.get(kind) / prior_value - 1.0
}

fn positive_rate_trend_value(days: u32, snapshot: &Snapshot, ctx: &EvalContext<'_>) -> f64 {
    let Some(series) = ctx.series else {
        return 0.0;
    };
    let Some(prior_snapshot) = series.snapshot_preceding(snapshot, days) else {
        return 0.0;
    };

    let kind = StatKind::for_transforms(true, true);
    let rate = |positive: Option<&epi_core::Observation>,
                total: Option<&epi_core::Observation>|
     -> Option<f64> {
        let positive = positive?.get(kind);
        let total = total?.get(kind);
        Some(if total == 0.0 { 0.0 } else { positive / total })
    };

    let prior_rate = rate(
        prior_snapshot.infection.tested_positive.as_ref(),
        prior_snapshot.infection.total_tests.as_ref(),
    );
    let current_rate = rate(
        snapshot.infection.tested_positive.as_ref(),
        snapshot.infection.total_tests.as_ref(),
    );
    match (prior_rate, current_rate) {
        (Some(prior), Some(current)) => current - prior,
        _ => 0.0,
    }
}

/// Sign with a distinct zero, matching how the percent-change law treats
/// exact zeroes.
fn js_sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// djb2-style accumulator over UTF-16 code units with 32-bit wrapping,
/// rendered as a `hash`-prefixed decimal.
fn hash_title(title: &str) -> String {
    let mut h: i32 = 0;
    for unit in title.encode_utf16() {
        h = h
            .wrapping_shl(5)
            .wrapping_sub(h)
            .wrapping_add(i32::from(unit));
    }
    format!("hash{h}")
}

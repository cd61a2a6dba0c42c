// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::distribution::DistributionSummary;

/// Raw peaks beyond this multiple of the trend peak read as lone outliers.
const MAX_RAW_TO_AVERAGE_FACTOR: f64 = 1.9;
/// Headroom granted above the trend peak when the raw peak is truncated.
const RAW_HEADROOM_FACTOR: f64 = 1.5;
/// Trend peaks beyond this multiple of the trend's own top quartile read
/// as disproportionate spikes.
const MAX_PEAK_AVERAGE_TO_TOP_QUARTILE_FACTOR: f64 = 2.2;
/// A trend jump must exceed this fraction of the trend peak to count as a
/// sudden spike.
const JUMP_FRACTION_OF_MAX: f64 = 0.5;

/// How much of a chart is drawn; reduced modes draw only trend lines.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartDisplayMode {
    Full,
    Mini,
    MiniWithTitle,
}

impl ChartDisplayMode {
    pub fn is_mini(self) -> bool {
        matches!(self, Self::Mini | Self::MiniWithTitle)
    }
}

/// The vertical range a chart should display.
///
/// `y_data_max`/`y_data_min` track the data bound chart elements are sized
/// against even when the displayed axis bound (`y_max`) has been truncated
/// below the true raw maximum.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleDecision {
    pub y_min: f64,
    pub y_max: f64,
    pub y_data_min: f64,
    pub y_data_max: f64,
    pub use_overshoot: bool,
}

impl ScaleDecision {
    fn from_range(y_min: f64, y_max: f64) -> Self {
        Self {
            y_min,
            y_max,
            y_data_min: y_min,
            y_data_max: y_max,
            use_overshoot: false,
        }
    }
}

/// Decides the displayed vertical range for a chart from its raw-series
/// and trend-series distributions.
///
/// Two truncation triggers keep a single record-breaking day from
/// compressing a multi-month trend into a sliver, evaluated in order with
/// the raw-outlier trigger taking precedence:
///
/// 1. the raw peak is a lone outlier far above the trend peak, or
/// 2. the trend itself peaks in one sudden jump disproportionate to its
///    own typical upper range.
///
/// Truncation applies only to unsigned domains; metrics that allow
/// negative values always get their full raw range. Returns `None` when
/// the governing summary is empty.
pub fn scale_for_summaries(
    mode: ChartDisplayMode,
    raw: &DistributionSummary,
    trend: &DistributionSummary,
    allow_negative: bool,
) -> Option<ScaleDecision> {
    // Reduced display modes scale to the trend alone and never truncate.
    if mode.is_mini() {
        let trend_stats = trend.stats()?;
        return Some(ScaleDecision::from_range(trend_stats.min, trend_stats.max));
    }

    let raw_stats = raw.stats()?;
    let mut decision = ScaleDecision::from_range(raw_stats.min, raw_stats.max);

    if allow_negative {
        return Some(decision);
    }

    let Some(trend_stats) = trend.stats() else {
        return Some(decision);
    };

    if raw_stats.max > trend_stats.max * MAX_RAW_TO_AVERAGE_FACTOR {
        decision.use_overshoot = true;
        decision.y_max = trend_stats.max * RAW_HEADROOM_FACTOR;
        decision.y_data_max = largest_raw_under(raw, decision.y_max);
        log::debug!(
            "scale truncated at raw outlier: raw max {} capped to {}",
            raw_stats.max,
            decision.y_max
        );
        return Some(decision);
    }

    let peak_is_disproportionate =
        trend_stats.max > trend_stats.top_quartile * MAX_PEAK_AVERAGE_TO_TOP_QUARTILE_FACTOR;
    let jump_dominates_peak = trend.max_jump().abs() > JUMP_FRACTION_OF_MAX * trend_stats.max;
    if peak_is_disproportionate && jump_dominates_peak {
        decision.use_overshoot = true;
        decision.y_max = trend_stats.top_quartile * MAX_PEAK_AVERAGE_TO_TOP_QUARTILE_FACTOR;
        decision.y_data_max = largest_raw_under(raw, decision.y_max);
        log::debug!(
            "scale truncated at trend spike: trend max {} capped to {}",
            trend_stats.max,
            decision.y_max
        );
    }

    Some(decision)
}

fn largest_raw_under(raw: &DistributionSummary, cap: f64) -> f64 {
    match raw.max_value_at_or_below(cap) {
        Some(value) => value,
        None => {
            log::warn!("no raw value fits under truncated axis cap {cap}");
            cap
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartDisplayMode, scale_for_summaries};
    use crate::distribution::DistributionSummary;
    use crate::series::SeriesPoint;

    fn summary(values: &[f64]) -> DistributionSummary {
        let points: Vec<SeriesPoint> = values.iter().copied().map(SeriesPoint::flat).collect();
        DistributionSummary::from_points(&points)
    }

    #[test]
    fn mini_mode_scales_to_the_trend_without_truncation() {
        let raw = summary(&[0.0, 1000.0]);
        let trend = summary(&[5.0, 50.0]);
        let decision =
            scale_for_summaries(ChartDisplayMode::Mini, &raw, &trend, false)
                .expect("trend data should produce a decision");
        assert_eq!(decision.y_min, 5.0);
        assert_eq!(decision.y_max, 50.0);
        assert!(!decision.use_overshoot);
    }

    #[test]
    fn full_mode_defaults_to_the_raw_range() {
        let raw = summary(&[2.0, 40.0, 80.0]);
        let trend = summary(&[10.0, 50.0, 70.0]);
        let decision = scale_for_summaries(ChartDisplayMode::Full, &raw, &trend, false)
            .expect("raw data should produce a decision");
        assert_eq!(decision.y_min, 2.0);
        assert_eq!(decision.y_max, 80.0);
        assert_eq!(decision.y_data_max, 80.0);
        assert!(!decision.use_overshoot);
    }

    #[test]
    fn signed_metrics_never_truncate() {
        let raw = summary(&[-10.0, 1000.0]);
        let trend = summary(&[1.0, 2.0]);
        let decision = scale_for_summaries(ChartDisplayMode::Full, &raw, &trend, true)
            .expect("raw data should produce a decision");
        assert!(!decision.use_overshoot);
        assert_eq!(decision.y_max, 1000.0);
    }

    #[test]
    fn raw_outlier_trigger_caps_the_axis_with_headroom() {
        // Raw peak 1000 against trend peak 100: 1000 > 100 * 1.9.
        let raw = summary(&[10.0, 60.0, 120.0, 1000.0]);
        let trend = summary(&[20.0, 80.0, 100.0]);
        let decision = scale_for_summaries(ChartDisplayMode::Full, &raw, &trend, false)
            .expect("raw data should produce a decision");

        assert!(decision.use_overshoot);
        assert_eq!(decision.y_max, 150.0);
        // The largest actual raw value under the cap sizes chart elements.
        assert_eq!(decision.y_data_max, 120.0);
        assert_eq!(decision.y_min, 10.0);
        assert_eq!(decision.y_data_min, 10.0);
    }

    #[test]
    fn trend_spike_trigger_caps_at_the_top_quartile_multiple() {
        // Trend sorted: [10, 10, 10, 11, 100] -> top quartile 11.
        // 100 > 11 * 2.2 and the chronological jump 10 -> 100 (90) exceeds
        // half the trend peak.
        let raw = summary(&[10.0, 12.0, 20.0, 100.0]);
        let trend = summary(&[10.0, 10.0, 10.0, 11.0, 100.0]);
        let decision = scale_for_summaries(ChartDisplayMode::Full, &raw, &trend, false)
            .expect("raw data should produce a decision");

        assert!(decision.use_overshoot);
        assert!((decision.y_max - 24.2).abs() < 1e-12);
        assert_eq!(decision.y_data_max, 20.0);
    }

    #[test]
    fn raw_outlier_trigger_takes_precedence_over_trend_spike() {
        // Both conditions hold; the decision must come from trigger A.
        let raw = summary(&[10.0, 40.0, 1000.0]);
        let trend = summary(&[10.0, 10.0, 10.0, 11.0, 100.0]);
        let decision = scale_for_summaries(ChartDisplayMode::Full, &raw, &trend, false)
            .expect("raw data should produce a decision");

        assert!(decision.use_overshoot);
        assert_eq!(decision.y_max, 150.0);
    }

    #[test]
    fn gradual_trends_do_not_trip_the_spike_trigger() {
        // The peak dwarfs the top quartile, but it is reached in steps no
        // larger than 30, under half the peak: both spike conditions must
        // hold for truncation.
        let trend = summary(&[
            10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 40.0, 70.0, 100.0,
        ]);
        let raw = summary(&[10.0, 50.0, 100.0]);
        let decision = scale_for_summaries(ChartDisplayMode::Full, &raw, &trend, false)
            .expect("raw data should produce a decision");
        assert!(!decision.use_overshoot);
    }

    #[test]
    fn empty_summaries_yield_no_decision() {
        let empty = DistributionSummary::empty();
        let data = summary(&[1.0, 2.0]);
        assert!(scale_for_summaries(ChartDisplayMode::Full, &empty, &data, false).is_none());
        assert!(scale_for_summaries(ChartDisplayMode::Mini, &data, &empty, false).is_none());
    }

    #[test]
    fn empty_trend_in_full_mode_keeps_the_raw_range() {
        let raw = summary(&[1.0, 500.0]);
        let decision = scale_for_summaries(
            ChartDisplayMode::Full,
            &raw,
            &DistributionSummary::empty(),
            false,
        )
        .expect("raw data should produce a decision");
        assert!(!decision.use_overshoot);
        assert_eq!(decision.y_max, 500.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn scale_decision_serde_roundtrip() {
        let raw = summary(&[10.0, 60.0, 120.0, 1000.0]);
        let trend = summary(&[20.0, 80.0, 100.0]);
        let decision = scale_for_summaries(ChartDisplayMode::Full, &raw, &trend, false)
            .expect("decision");

        let encoded = serde_json::to_string(&decision).expect("decision should serialize");
        let decoded: super::ScaleDecision =
            serde_json::from_str(&encoded).expect("decision should deserialize");
        assert_eq!(decoded, decision);
    }

    #[test]
    fn truncation_monotonicity_as_the_trend_peak_falls() {
        // Holding the raw summary fixed, lowering the trend peak below
        // raw_max / 1.9 flips the outlier trigger on.
        let raw = summary(&[10.0, 60.0, 120.0, 190.0]);

        let tall_trend = summary(&[50.0, 100.0, 120.0]);
        let no_cut = scale_for_summaries(ChartDisplayMode::Full, &raw, &tall_trend, false)
            .expect("decision");
        assert!(!no_cut.use_overshoot);

        let short_trend = summary(&[20.0, 50.0, 90.0]);
        let cut = scale_for_summaries(ChartDisplayMode::Full, &raw, &short_trend, false)
            .expect("decision");
        assert!(cut.use_overshoot);
        assert!(cut.y_data_max <= 190.0);
    }
}

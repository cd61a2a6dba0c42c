// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::series::SeriesPoint;

/// Order statistics of a sorted-by-peak batch of points.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SummaryStats {
    pub min: f64,
    pub max: f64,
    pub bottom_quartile: f64,
    pub median: f64,
    pub top_quartile: f64,
}

/// Distribution of an arbitrary batch of series points, plus the largest
/// single-step jump any input series takes between chronologically
/// adjacent points.
///
/// The jump is a directional discontinuity detector: scale truncation uses
/// it to recognize a trend line whose peak is one sudden spike rather than
/// a sustained level. It is computed per input series before flattening,
/// so series boundaries never read as discontinuities.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct DistributionSummary {
    points: Vec<SeriesPoint>,
    max_jump: f64,
    stats: Option<SummaryStats>,
}

impl DistributionSummary {
    /// Summary over several series flattened together. Each series
    /// contributes its own chronological jump scan; the retained jump is
    /// the one of greatest magnitude, sign preserved.
    pub fn from_series(series: &[&[SeriesPoint]]) -> Self {
        let mut max_jump = 0.0_f64;
        for points in series {
            for pair in points.windows(2) {
                let difference = pair[1].value - pair[0].value;
                if difference.abs() > max_jump.abs() {
                    max_jump = difference;
                }
            }
        }

        let mut flattened: Vec<SeriesPoint> =
            series.iter().flat_map(|points| points.iter().copied()).collect();
        flattened.sort_by(|a, b| a.value.total_cmp(&b.value));

        let stats = summary_stats(&flattened);
        Self {
            points: flattened,
            max_jump,
            stats,
        }
    }

    /// Summary over a single series.
    pub fn from_points(points: &[SeriesPoint]) -> Self {
        Self::from_series(&[points])
    }

    /// Empty summary, the "no data" marker.
    pub fn empty() -> Self {
        Self::from_series(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `None` when the summary was built from no data.
    pub fn stats(&self) -> Option<&SummaryStats> {
        self.stats.as_ref()
    }

    /// Largest signed chronological jump across the input series.
    pub fn max_jump(&self) -> f64 {
        self.max_jump
    }

    /// Greatest value at or below `threshold`, or `None` when the
    /// threshold sits below every value.
    ///
    /// Binary search over the sorted-by-value order: `low` tracks the
    /// greatest index whose value fits, `high` the least that does not.
    pub fn max_value_at_or_below(&self, threshold: f64) -> Option<f64> {
        let mut low: isize = -1;
        let mut high = self.points.len() as isize;
        while 1 + low < high {
            let mid = low + ((high - low) >> 1);
            if self.points[mid as usize].value > threshold {
                high = mid;
            } else {
                low = mid;
            }
        }
        if low < 0 {
            return None;
        }
        Some(self.points[low as usize].value)
    }
}

fn summary_stats(sorted: &[SeriesPoint]) -> Option<SummaryStats> {
    if sorted.is_empty() {
        return None;
    }
    let max_index = sorted.len() - 1;
    let at = |position: f64| sorted[position.round() as usize].value;

    Some(SummaryStats {
        min: sorted[0].value,
        max: sorted[max_index].value,
        bottom_quartile: at(max_index as f64 / 4.0),
        median: at(max_index as f64 / 2.0),
        top_quartile: at(3.0 * max_index as f64 / 4.0),
    })
}

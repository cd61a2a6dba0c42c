// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

/// One drawable point of a series: the bar's baseline and its visual peak.
///
/// For stacked series the baseline is the top of the stack below; the
/// point's "value" for scale and sorting purposes is the peak, not the
/// difference.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SeriesPoint {
    pub baseline: f64,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(baseline: f64, value: f64) -> Self {
        Self { baseline, value }
    }

    /// A point sitting on the zero axis.
    pub fn flat(value: f64) -> Self {
        Self {
            baseline: 0.0,
            value,
        }
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use epi_metrics::{CASE_DATA_COLOR, DEATH_DATA_COLOR, Rgb, Rgba, TEST_DATA_COLOR};

/// Visual state of a contiguous index range of a series.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawMode {
    Default,
    /// The compared span is worsening.
    Negative,
    /// The compared span is improving.
    Positive,
    /// Outside the compared span.
    Inactive,
}

/// A contiguous index range of a series tagged with a draw mode.
///
/// Boundary ownership: interior boundaries belong exclusively to the
/// adjacent active segment, so a bar at the seam of a comparison is never
/// double-colored. Inactive segments are boundary-inclusive only at the
/// series' true endpoints.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChartSegment {
    pub begin: usize,
    pub end: usize,
    pub draw_mode: DrawMode,
    chart_range: (usize, usize),
}

impl ChartSegment {
    pub fn new(begin: usize, end: usize, draw_mode: DrawMode, chart_range: (usize, usize)) -> Self {
        Self {
            begin,
            end,
            draw_mode,
            chart_range,
        }
    }

    /// Single default segment spanning a whole series.
    pub fn base_for_len(len: usize) -> Self {
        let last = len.saturating_sub(1);
        Self::new(0, last, DrawMode::Default, (0, last))
    }

    pub fn contains(&self, index: usize) -> bool {
        let on_edge = index == self.chart_range.0 || index == self.chart_range.1;
        let inclusive = self.draw_mode != DrawMode::Inactive || on_edge;
        let above_bottom = if inclusive {
            index >= self.begin
        } else {
            index > self.begin
        };
        let below_top = if inclusive {
            index <= self.end
        } else {
            index < self.end
        };
        above_bottom && below_top
    }
}

/// Draw mode for the span between two compared values. Improvement means
/// the later value is lower, unless the metric counts up as good.
pub fn draw_mode_for_comparison(first_value: f64, second_value: f64, up_is_better: bool) -> DrawMode {
    if first_value == second_value {
        return DrawMode::Default;
    }
    let mut getting_better = second_value < first_value;
    if up_is_better {
        getting_better = !getting_better;
    }
    if getting_better {
        DrawMode::Positive
    } else {
        DrawMode::Negative
    }
}

/// Partitions a series into ordered draw segments for a comparison
/// selection of zero, one, or two indices.
///
/// Out-of-range selections are a caller bug; they are clamped after a
/// debug assertion. A degenerate two-point selection on the same index
/// still produces the three-segment structure.
pub fn segments_for_selection(
    len: usize,
    selection: &[usize],
    compared_mode: DrawMode,
) -> Vec<ChartSegment> {
    if len == 0 || selection.len() < 2 {
        return vec![ChartSegment::base_for_len(len)];
    }

    let last = len - 1;
    debug_assert!(
        selection.iter().all(|index| *index <= last),
        "comparison selection out of series bounds"
    );
    let mut first = selection[0].min(last);
    let mut second = selection[1].min(last);
    if first > second {
        std::mem::swap(&mut first, &mut second);
    }

    let range = (0, last);
    vec![
        ChartSegment::new(0, first, DrawMode::Inactive, range),
        ChartSegment::new(first, second, compared_mode, range),
        ChartSegment::new(second, last, DrawMode::Inactive, range),
    ]
}

/// First segment claiming `index`, mirroring the renderer's paint order.
pub fn segment_for_index(index: usize, segments: &[ChartSegment]) -> Option<&ChartSegment> {
    let found = segments.iter().find(|segment| segment.contains(index));
    if found.is_none() {
        log::warn!("no draw segment found for index {index}");
    }
    found
}

/// Color for a segment of a series drawn in `mode`. The default mode uses
/// the metric's own base color; comparison modes use the shared
/// improving/worsening/inactive palette.
pub fn color_for_draw_mode(base: Rgb, mode: DrawMode, alpha: f64) -> Rgba {
    match mode {
        DrawMode::Default => base.with_alpha(alpha),
        DrawMode::Negative => CASE_DATA_COLOR.with_alpha(alpha),
        DrawMode::Positive => TEST_DATA_COLOR.with_alpha(alpha),
        DrawMode::Inactive => DEATH_DATA_COLOR.with_alpha(alpha * 0.4),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ChartSegment, DrawMode, color_for_draw_mode, draw_mode_for_comparison, segment_for_index,
        segments_for_selection,
    };
    use epi_metrics::Rgb;

    #[test]
    fn empty_and_single_selections_produce_one_default_segment() {
        for selection in [&[] as &[usize], &[4]] {
            let segments = segments_for_selection(10, selection, DrawMode::Default);
            assert_eq!(segments.len(), 1);
            assert_eq!(segments[0].draw_mode, DrawMode::Default);
            assert!(segments[0].contains(0));
            assert!(segments[0].contains(9));
        }
    }

    #[test]
    fn two_point_selection_produces_three_ordered_segments() {
        let segments = segments_for_selection(10, &[2, 7], DrawMode::Positive);
        assert_eq!(segments.len(), 3);
        assert_eq!(
            (segments[0].begin, segments[0].end, segments[0].draw_mode),
            (0, 2, DrawMode::Inactive)
        );
        assert_eq!(
            (segments[1].begin, segments[1].end, segments[1].draw_mode),
            (2, 7, DrawMode::Positive)
        );
        assert_eq!(
            (segments[2].begin, segments[2].end, segments[2].draw_mode),
            (7, 9, DrawMode::Inactive)
        );
    }

    #[test]
    fn selection_order_does_not_matter() {
        assert_eq!(
            segments_for_selection(10, &[7, 2], DrawMode::Negative),
            segments_for_selection(10, &[2, 7], DrawMode::Negative)
        );
    }

    #[test]
    fn interior_boundaries_belong_to_the_active_segment_only() {
        let segments = segments_for_selection(10, &[2, 7], DrawMode::Positive);

        // The leading inactive segment does not claim its seam index.
        assert!(!segments[0].contains(2));
        assert!(segments[1].contains(2));
        assert!(segments[1].contains(7));
        assert!(!segments[2].contains(7));

        // Interior membership.
        assert!(segments[0].contains(1));
        assert!(segments[1].contains(5));
        assert!(segments[2].contains(8));
    }

    #[test]
    fn inactive_segments_keep_the_series_endpoints() {
        let segments = segments_for_selection(10, &[2, 7], DrawMode::Positive);
        assert!(segments[0].contains(0));
        assert!(segments[2].contains(9));
    }

    #[test]
    fn every_index_resolves_to_exactly_one_segment_first() {
        let segments = segments_for_selection(10, &[2, 7], DrawMode::Negative);
        let owners: Vec<DrawMode> = (0..10)
            .map(|index| {
                segment_for_index(index, &segments)
                    .expect("every index should have an owner")
                    .draw_mode
            })
            .collect();
        assert_eq!(
            owners,
            [
                DrawMode::Inactive,
                DrawMode::Inactive,
                DrawMode::Negative,
                DrawMode::Negative,
                DrawMode::Negative,
                DrawMode::Negative,
                DrawMode::Negative,
                DrawMode::Negative,
                DrawMode::Inactive,
                DrawMode::Inactive,
            ]
        );
    }

    #[test]
    fn degenerate_equal_selection_still_builds_three_segments() {
        let segments = segments_for_selection(10, &[4, 4], DrawMode::Default);
        assert_eq!(segments.len(), 3);
        assert_eq!((segments[1].begin, segments[1].end), (4, 4));
        assert!(segments[1].contains(4));
        assert!(!segments[0].contains(4));
        assert!(!segments[2].contains(4));
    }

    #[test]
    fn selection_at_series_edges_keeps_endpoints_resolvable() {
        let segments = segments_for_selection(10, &[0, 9], DrawMode::Positive);
        assert_eq!(
            segment_for_index(0, &segments)
                .expect("index 0 should resolve")
                .draw_mode,
            DrawMode::Inactive
        );
        assert!(segments[1].contains(0));
        assert!(segments[1].contains(9));
    }

    #[test]
    fn comparison_direction_respects_up_is_better() {
        assert_eq!(
            draw_mode_for_comparison(100.0, 60.0, false),
            DrawMode::Positive
        );
        assert_eq!(
            draw_mode_for_comparison(100.0, 140.0, false),
            DrawMode::Negative
        );
        assert_eq!(
            draw_mode_for_comparison(100.0, 140.0, true),
            DrawMode::Positive
        );
        assert_eq!(
            draw_mode_for_comparison(100.0, 100.0, true),
            DrawMode::Default
        );
    }

    #[test]
    fn comparison_colors_come_from_the_shared_palette() {
        let base = Rgb::new(1, 2, 3);
        assert_eq!(color_for_draw_mode(base, DrawMode::Default, 1.0).rgb, base);
        assert_eq!(
            color_for_draw_mode(base, DrawMode::Negative, 1.0).rgb,
            Rgb::new(203, 25, 29)
        );
        assert_eq!(
            color_for_draw_mode(base, DrawMode::Positive, 1.0).rgb,
            Rgb::new(38, 120, 144)
        );
        let inactive = color_for_draw_mode(base, DrawMode::Inactive, 1.0);
        assert_eq!(inactive.rgb, Rgb::new(47, 42, 45));
        assert!((inactive.alpha - 0.4).abs() < 1e-12);
    }
}

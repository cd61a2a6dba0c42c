// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::series::SeriesPoint;
use epi_metrics::AnnotationPlacement;

const WEEK_AGO_POINTS: usize = 7;

/// Which side of its anchor point an annotation is drawn on.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnnotationOrientation {
    Above,
    Below,
    /// The series has no drawable point at its anchor.
    None,
}

/// One displayed series, as the annotation placer sees it.
#[derive(Clone, Copy, Debug)]
pub struct ChartSeriesView<'a> {
    pub points: &'a [SeriesPoint],
    /// Set for series carrying an annotation; the placement picks the
    /// anchor policy.
    pub annotation: Option<AnnotationPlacement>,
}

/// Resolved placement for one annotated series.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedAnnotation {
    /// Index into the input series list.
    pub series_index: usize,
    pub anchor_index: usize,
    pub orientation: AnnotationOrientation,
}

/// Anchor index for a placement policy, clamped into `[0, len-1]`.
///
/// `WeekAgo` anchors seven points back from the end; series too short for
/// a clean week back anchor at their final point instead. `AtDataMax`
/// anchors at the first maximum of `|value|`.
pub fn anchor_index(placement: AnnotationPlacement, points: &[SeriesPoint]) -> usize {
    if points.is_empty() {
        return 0;
    }
    let last = points.len() - 1;
    let index = match placement {
        AnnotationPlacement::WeekAgo => {
            if points.len() < 2 * WEEK_AGO_POINTS {
                last
            } else {
                points.len() - WEEK_AGO_POINTS
            }
        }
        AnnotationPlacement::AtDataMax => {
            let mut max_index = 0;
            let mut current_max = 0.0_f64;
            for (index, point) in points.iter().enumerate() {
                let magnitude = point.value.abs();
                if magnitude > current_max {
                    current_max = magnitude;
                    max_index = index;
                }
            }
            max_index
        }
    };
    index.min(last)
}

/// Chooses an anchor and an above/below orientation for every annotated
/// series so labels avoid overlapping the data they are not attached to.
///
/// The natural orientation is above when the anchor value sits at or above
/// every competing series' value at the same index. The choice then clamps
/// to keep the annotation's bounding height (in value units) inside the
/// visible vertical range, flipping when the naive side would clip.
pub fn place_annotations(
    series: &[ChartSeriesView<'_>],
    visible_range: (f64, f64),
    annotation_height: f64,
) -> Vec<PlacedAnnotation> {
    let (y_min, y_max) = visible_range;

    series
        .iter()
        .enumerate()
        .filter_map(|(series_index, view)| {
            let placement = view.annotation?;
            Some((series_index, view, placement))
        })
        .map(|(series_index, view, placement)| {
            let anchor = anchor_index(placement, view.points);
            let Some(anchor_point) = view.points.get(anchor) else {
                return PlacedAnnotation {
                    series_index,
                    anchor_index: anchor,
                    orientation: AnnotationOrientation::None,
                };
            };
            let anchor_value = anchor_point.value;

            let above_all = series
                .iter()
                .enumerate()
                .filter(|(other_index, _)| *other_index != series_index)
                .filter_map(|(_, competing)| competing.points.get(anchor))
                .all(|competing_point| anchor_value >= competing_point.value);

            let natural = if above_all {
                AnnotationOrientation::Above
            } else {
                AnnotationOrientation::Below
            };
            let orientation = match natural {
                AnnotationOrientation::Above if anchor_value + annotation_height > y_max => {
                    log::debug!("annotation flipped below: would clip the top at {anchor_value}");
                    AnnotationOrientation::Below
                }
                AnnotationOrientation::Below if anchor_value - annotation_height < y_min => {
                    log::debug!("annotation flipped above: would clip the bottom at {anchor_value}");
                    AnnotationOrientation::Above
                }
                natural => natural,
            };

            PlacedAnnotation {
                series_index,
                anchor_index: anchor,
                orientation,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        AnnotationOrientation, ChartSeriesView, anchor_index, place_annotations,
    };
    use crate::series::SeriesPoint;
    use epi_metrics::AnnotationPlacement;

    fn flat(values: &[f64]) -> Vec<SeriesPoint> {
        values.iter().copied().map(SeriesPoint::flat).collect()
    }

    #[test]
    fn week_ago_anchor_counts_back_from_the_end() {
        let points = flat(&(0..20).map(f64::from).collect::<Vec<_>>());
        assert_eq!(anchor_index(AnnotationPlacement::WeekAgo, &points), 13);
    }

    #[test]
    fn week_ago_anchor_falls_back_to_the_final_point_for_short_series() {
        let points = flat(&(0..10).map(f64::from).collect::<Vec<_>>());
        assert_eq!(anchor_index(AnnotationPlacement::WeekAgo, &points), 9);

        let tiny = flat(&[1.0, 2.0]);
        assert_eq!(anchor_index(AnnotationPlacement::WeekAgo, &tiny), 1);
        assert_eq!(anchor_index(AnnotationPlacement::WeekAgo, &[]), 0);
    }

    #[test]
    fn data_max_anchor_finds_the_first_absolute_peak() {
        let points = flat(&[1.0, -9.0, 5.0, 9.0, 2.0]);
        assert_eq!(anchor_index(AnnotationPlacement::AtDataMax, &points), 1);

        let single_peak = flat(&[1.0, 2.0, 30.0, 2.0]);
        assert_eq!(anchor_index(AnnotationPlacement::AtDataMax, &single_peak), 2);
    }

    #[test]
    fn annotation_above_when_anchor_tops_every_competitor() {
        let annotated = flat(&[50.0; 20]);
        let low = flat(&[10.0; 20]);
        let placements = place_annotations(
            &[
                ChartSeriesView {
                    points: &annotated,
                    annotation: Some(AnnotationPlacement::WeekAgo),
                },
                ChartSeriesView {
                    points: &low,
                    annotation: None,
                },
            ],
            (0.0, 100.0),
            5.0,
        );

        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].series_index, 0);
        assert_eq!(placements[0].anchor_index, 13);
        assert_eq!(placements[0].orientation, AnnotationOrientation::Above);
    }

    #[test]
    fn annotation_below_when_any_competitor_is_higher_at_the_anchor() {
        let annotated = flat(&[50.0; 20]);
        let higher = flat(&[80.0; 20]);
        let placements = place_annotations(
            &[
                ChartSeriesView {
                    points: &annotated,
                    annotation: Some(AnnotationPlacement::WeekAgo),
                },
                ChartSeriesView {
                    points: &higher,
                    annotation: None,
                },
            ],
            (0.0, 100.0),
            5.0,
        );
        assert_eq!(placements[0].orientation, AnnotationOrientation::Below);
    }

    #[test]
    fn competitors_without_a_point_at_the_anchor_are_ignored() {
        let annotated = flat(&[50.0; 20]);
        let short = flat(&[90.0; 5]);
        let placements = place_annotations(
            &[
                ChartSeriesView {
                    points: &annotated,
                    annotation: Some(AnnotationPlacement::WeekAgo),
                },
                ChartSeriesView {
                    points: &short,
                    annotation: None,
                },
            ],
            (0.0, 100.0),
            5.0,
        );
        assert_eq!(placements[0].orientation, AnnotationOrientation::Above);
    }

    #[test]
    fn orientation_flips_to_avoid_clipping_the_top() {
        // Anchor at 98 with height 5 would clip past the 100 top.
        let annotated = flat(&[98.0; 20]);
        let placements = place_annotations(
            &[ChartSeriesView {
                points: &annotated,
                annotation: Some(AnnotationPlacement::WeekAgo),
            }],
            (0.0, 100.0),
            5.0,
        );
        assert_eq!(placements[0].orientation, AnnotationOrientation::Below);
    }

    #[test]
    fn orientation_flips_to_avoid_clipping_the_bottom() {
        let annotated = flat(&[2.0; 20]);
        let higher = flat(&[80.0; 20]);
        let placements = place_annotations(
            &[
                ChartSeriesView {
                    points: &annotated,
                    annotation: Some(AnnotationPlacement::WeekAgo),
                },
                ChartSeriesView {
                    points: &higher,
                    annotation: None,
                },
            ],
            (0.0, 100.0),
            5.0,
        );
        assert_eq!(placements[0].orientation, AnnotationOrientation::Above);
    }

    #[test]
    fn empty_annotated_series_gets_no_orientation() {
        let placements = place_annotations(
            &[ChartSeriesView {
                points: &[],
                annotation: Some(AnnotationPlacement::AtDataMax),
            }],
            (0.0, 100.0),
            5.0,
        );
        assert_eq!(placements[0].orientation, AnnotationOrientation::None);
    }

    #[test]
    fn ties_at_the_anchor_count_as_above() {
        let annotated = flat(&[50.0; 20]);
        let equal = flat(&[50.0; 20]);
        let placements = place_annotations(
            &[
                ChartSeriesView {
                    points: &annotated,
                    annotation: Some(AnnotationPlacement::WeekAgo),
                },
                ChartSeriesView {
                    points: &equal,
                    annotation: None,
                },
            ],
            (0.0, 100.0),
            5.0,
        );
        assert_eq!(placements[0].orientation, AnnotationOrientation::Above);
    }

    #[test]
    fn multiple_annotated_series_place_independently() {
        let high = flat(&[90.0; 20]);
        let low = flat(&[10.0; 20]);
        let placements = place_annotations(
            &[
                ChartSeriesView {
                    points: &high,
                    annotation: Some(AnnotationPlacement::WeekAgo),
                },
                ChartSeriesView {
                    points: &low,
                    annotation: Some(AnnotationPlacement::WeekAgo),
                },
            ],
            (0.0, 200.0),
            5.0,
        );
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].orientation, AnnotationOrientation::Above);
        assert_eq!(placements[1].orientation, AnnotationOrientation::Below);
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0

#![no_main]

#[path = "common.rs"]
mod common;

use epi_chart::{
    ChartDisplayMode, ChartSeriesView, DistributionSummary, DrawMode, SeriesPoint,
    draw_mode_for_comparison, place_annotations, scale_for_summaries, segment_for_index,
    segments_for_selection,
};
use epi_metrics::AnnotationPlacement;
use libfuzzer_sys::fuzz_target;

fn build_points(cursor: &mut common::ByteCursor<'_>, len: usize) -> Vec<SeriesPoint> {
    (0..len)
        .map(|_| {
            let raw = cursor.next_f64();
            // Keep NaN out (the data model scrubs it on ingest) but let
            // everything else through, infinities included.
            let value = if raw.is_nan() { 0.0 } else { raw };
            let baseline = f64::from(cursor.next_i16());
            SeriesPoint::new(baseline, value)
        })
        .collect()
}

fn display_mode(seed: u8) -> ChartDisplayMode {
    match seed % 3 {
        0 => ChartDisplayMode::Full,
        1 => ChartDisplayMode::Mini,
        _ => ChartDisplayMode::MiniWithTitle,
    }
}

fuzz_target!(|data: &[u8]| {
    let mut cursor = common::ByteCursor::new(data);

    let raw_len = common::bounded(cursor.next_u8(), 0, 128);
    let trend_len = common::bounded(cursor.next_u8(), 0, 128);
    let raw_points = build_points(&mut cursor, raw_len);
    let trend_points = build_points(&mut cursor, trend_len);

    let raw = DistributionSummary::from_points(&raw_points);
    let trend = DistributionSummary::from_series(&[&raw_points, &trend_points]);

    let threshold = f64::from(cursor.next_i16());
    let _ = raw.max_value_at_or_below(threshold);
    let _ = trend.max_value_at_or_below(threshold);

    let mode = display_mode(cursor.next_u8());
    let allow_negative = cursor.next_u8() & 1 == 0;
    let _ = scale_for_summaries(mode, &raw, &trend, allow_negative);

    // Comparison segmentation over an arbitrary in-range selection.
    let len = raw_points.len();
    if len > 0 {
        let first = common::bounded(cursor.next_u8(), 0, len - 1);
        let second = common::bounded(cursor.next_u8(), 0, len - 1);
        let compared = draw_mode_for_comparison(
            f64::from(cursor.next_i16()),
            f64::from(cursor.next_i16()),
            cursor.next_u8() & 1 == 0,
        );
        let selection: &[usize] = match cursor.next_u8() % 3 {
            0 => &[],
            1 => &[first],
            _ => &[first, second],
        };
        let segments = segments_for_selection(len, selection, compared);
        for index in 0..len {
            let owner = segment_for_index(index, &segments);
            assert!(owner.is_some(), "index {index} must resolve to a segment");
        }
        if selection.len() == 2 {
            assert_eq!(segments.len(), 3);
            assert_eq!(segments[0].draw_mode, DrawMode::Inactive);
            assert_eq!(segments[2].draw_mode, DrawMode::Inactive);
        }
    }

    // Annotation placement against arbitrary competitors and ranges.
    let placement = if cursor.next_u8() & 1 == 0 {
        AnnotationPlacement::WeekAgo
    } else {
        AnnotationPlacement::AtDataMax
    };
    let y_min = f64::from(cursor.next_i16());
    let y_max = f64::from(cursor.next_i16());
    let height = f64::from(cursor.next_u8());
    let placements = place_annotations(
        &[
            ChartSeriesView {
                points: &raw_points,
                annotation: Some(placement),
            },
            ChartSeriesView {
                points: &trend_points,
                annotation: None,
            },
        ],
        (y_min, y_max),
        height,
    );
    for placed in &placements {
        if !raw_points.is_empty() {
            assert!(placed.anchor_index < raw_points.len());
        }
    }
});

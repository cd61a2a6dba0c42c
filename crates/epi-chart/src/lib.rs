// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod annotate;
pub mod distribution;
pub mod scale;
pub mod segment;
pub mod series;

pub use annotate::{AnnotationOrientation, ChartSeriesView, PlacedAnnotation, place_annotations};
pub use distribution::{DistributionSummary, SummaryStats};
pub use scale::{ChartDisplayMode, ScaleDecision, scale_for_summaries};
pub use segment::{
    ChartSegment, DrawMode, color_for_draw_mode, draw_mode_for_comparison, segment_for_index,
    segments_for_selection,
};
pub use series::SeriesPoint;

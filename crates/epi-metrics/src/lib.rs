// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod color;
pub mod composite;
pub mod evaluator;
pub mod format;
pub mod library;
pub mod mobility;

pub use color::{
    CASE_DATA_COLOR, DEATH_DATA_COLOR, HOSPITALIZED_DATA_COLOR, MOBILITY_DARK_COLOR,
    MOBILITY_DATA_COLOR, PERCENT_POSITIVE_BENCHMARK_COLOR, PERCENT_POSITIVE_DATA_COLOR, Rgb, Rgba,
    TEST_DATA_COLOR,
};
pub use composite::{Combiner, CompositeEvaluator, Metric};
pub use evaluator::{
    Annotation, AnnotationPlacement, FilterRule, IntensityParams, MetricEvaluator, StatSource,
    ToggleStrategy, VerbStyle,
};
pub use format::ValueFormat;

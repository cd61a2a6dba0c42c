// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::color::{MOBILITY_DARK_COLOR, MOBILITY_DATA_COLOR};
use crate::evaluator::{
    Annotation, AnnotationPlacement, MetricEvaluator, StatSource, ToggleStrategy,
};
use crate::format::ValueFormat;
use epi_core::{MobilityCategory, RegionLevel};

const GOOGLE_MOBILITY_NAME: &str = "Google Mobility";

/// Display adjective for a mobility category.
pub fn category_adjective(category: MobilityCategory) -> &'static str {
    match category {
        MobilityCategory::RetailAndRecreation => "Retail",
        MobilityCategory::Workplace => "Workplace",
        MobilityCategory::Transit => "Transit",
        MobilityCategory::Parks => "Park",
        MobilityCategory::Residential => "Residential",
    }
}

/// The mobility metric family. Toggling cycles through the five
/// categories; values are signed change fractions displayed as percents.
pub fn mobility(with_benchmark: bool) -> MetricEvaluator {
    let mut result = MetricEvaluator::new("Mobility", "visitation", StatSource::Mobility);
    result.toggle_strategy = ToggleStrategy::CycleCategories;
    result.allow_negative = true;
    result.display_as_percent = true;
    result.value_format = ValueFormat::Percent { decimals: 0 };
    result.noun_with_number = Some("change".to_string());
    result.intensity.base_color = MOBILITY_DATA_COLOR;
    result.intensity.max_power_of_ten = 0.0;
    result.supported_level = RegionLevel::County;
    result.source = Some(GOOGLE_MOBILITY_NAME.to_string());
    if with_benchmark {
        result.benchmark = Some(Box::new(national_mobility().into()));
        result.benchmark_level = RegionLevel::Nation;
    }
    result
}

/// Nation-level benchmark variant of the mobility metric: smoothed, drawn
/// unfilled, annotated as the national average.
pub fn national_mobility() -> MetricEvaluator {
    let mut result = mobility(false);
    result.title = "National Mobility Data".to_string();
    result.intensity.base_color = MOBILITY_DARK_COLOR;
    result.smoothed = true;
    result.wants_fill = false;
    result.annotation = Some(Annotation {
        text: "National average".to_string(),
        placement: AnnotationPlacement::WeekAgo,
    });
    result
}

// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::color::{
    CASE_DATA_COLOR, DEATH_DATA_COLOR, HOSPITALIZED_DATA_COLOR, PERCENT_POSITIVE_BENCHMARK_COLOR,
    PERCENT_POSITIVE_DATA_COLOR, TEST_DATA_COLOR,
};
use crate::composite::{Combiner, CompositeEvaluator};
use crate::evaluator::{
    Annotation, AnnotationPlacement, FilterRule, MetricEvaluator, StatSource, VerbStyle,
};
use crate::format::ValueFormat;
use epi_core::{InfectionField, RegionLevel};

pub const DEFAULT_TREND_LENGTH: u32 = 7;

const COVID_TRACKING_NAME: &str = "The COVID Tracking Project";
const NYT_NAME: &str = "The New York Times";

/// Cumulative confirmed cases, down to county granularity.
pub fn confirmed_cases() -> MetricEvaluator {
    let mut result = MetricEvaluator::new(
        "Confirmed cases",
        "cases",
        StatSource::Infection(InfectionField::Cases),
    );
    result.intensity.base_color = CASE_DATA_COLOR;
    result.intensity.max_power_of_ten = 5.0;
    result.supported_level = RegionLevel::County;
    result.source = Some(NYT_NAME.to_string());
    result
}

pub fn new_confirmed_cases() -> MetricEvaluator {
    let mut result = confirmed_cases();
    result.title = "New cases".to_string();
    result.measure_delta = true;
    result
}

pub fn deaths() -> MetricEvaluator {
    let mut result = MetricEvaluator::new(
        "Deaths",
        "deaths",
        StatSource::Infection(InfectionField::Deaths),
    );
    result.intensity.base_color = DEATH_DATA_COLOR;
    result.intensity.max_power_of_ten = 3.0;
    result.supported_level = RegionLevel::County;
    result.source = Some(NYT_NAME.to_string());
    result
}

pub fn new_deaths() -> MetricEvaluator {
    let mut result = deaths();
    result.title = "New deaths".to_string();
    result.measure_delta = true;
    result
}

/// Net currently-hospitalized count; the daily view is a signed change.
pub fn currently_hospitalized() -> MetricEvaluator {
    let mut result = MetricEvaluator::new(
        "Currently hospitalized",
        "currently hospitalized",
        StatSource::Infection(InfectionField::Hospitalized),
    );
    result.filter = Some(FilterRule::PositiveHospitalization);
    result.intensity.base_color = HOSPITALIZED_DATA_COLOR;
    result.intensity.max_power_of_ten = 3.0;
    result.noun_with_number = Some("hospitalized".to_string());
    result.delta_adjective = "Change in".to_string();
    result.allow_negative = true;
    result.source = Some(COVID_TRACKING_NAME.to_string());
    result
}

pub fn total_tests() -> MetricEvaluator {
    let mut result = MetricEvaluator::new(
        "Total tests",
        "tests",
        StatSource::Infection(InfectionField::TotalTests),
    );
    result.filter = Some(FilterRule::HasTotalTests);
    result.intensity.base_color = TEST_DATA_COLOR;
    result.intensity.max_power_of_ten = 7.0;
    result.up_is_better = true;
    result.source = Some(COVID_TRACKING_NAME.to_string());
    result
}

pub fn new_tests() -> MetricEvaluator {
    let mut result = total_tests();
    result.title = "New tests".to_string();
    result.measure_delta = true;
    result
}

pub fn tested_positive() -> MetricEvaluator {
    let mut result = MetricEvaluator::new(
        "Total positive results",
        "tests",
        StatSource::Infection(InfectionField::TestedPositive),
    );
    result.filter = Some(FilterRule::HasTestedPositive);
    result.intensity.base_color = CASE_DATA_COLOR;
    result.intensity.max_power_of_ten = 5.0;
    result.source = Some(COVID_TRACKING_NAME.to_string());
    result
}

pub fn new_tested_positive() -> MetricEvaluator {
    let mut result = tested_positive();
    result.title = "New positive results".to_string();
    result.measure_delta = true;
    result
}

pub fn tested_negative() -> MetricEvaluator {
    let mut result = MetricEvaluator::new(
        "Total negative results",
        "tests",
        StatSource::Infection(InfectionField::TestedNegative),
    );
    result.intensity.base_color = TEST_DATA_COLOR;
    result.intensity.max_power_of_ten = 5.0;
    result.up_is_better = true;
    result.source = Some(COVID_TRACKING_NAME.to_string());
    result
}

pub fn new_tested_negative() -> MetricEvaluator {
    let mut result = tested_negative();
    result.title = "New negative results".to_string();
    result.measure_delta = true;
    result
}

/// Daily tests stacked into positive and negative results.
pub fn new_test_breakdown() -> CompositeEvaluator {
    let mut result = CompositeEvaluator::new(
        vec![new_tested_positive(), new_tested_negative()],
        Combiner::Sum,
        false,
    );
    result.title = "New tests".to_string();
    result.noun = "tests".to_string();
    result.up_is_better = true;
    result
}

pub fn total_test_breakdown() -> CompositeEvaluator {
    let mut result = CompositeEvaluator::new(
        vec![tested_positive(), tested_negative()],
        Combiner::Sum,
        false,
    );
    result.title = "Total tests".to_string();
    result.noun = "tests".to_string();
    result.up_is_better = true;
    result
}

/// Daily cases stacked with deaths drawn underneath.
pub fn new_case_breakdown() -> CompositeEvaluator {
    let mut result = CompositeEvaluator::new(
        vec![new_deaths(), new_confirmed_cases()],
        Combiner::Sum,
        false,
    );
    result.title = "New cases".to_string();
    result.noun = "people".to_string();
    result
}

/// Share of tests coming back positive, as a quotient over positive and
/// negative result counts. The negative child exists only to complete the
/// denominator and is not displayed.
pub fn percent_positive(smoothed: bool, with_benchmark: bool) -> CompositeEvaluator {
    let mut positive = new_tested_positive();
    positive.cumulative_adjective = "overall".to_string();
    positive.delta_adjective = "daily".to_string();
    positive.noun_with_number = Some("positive".to_string());
    positive.intensity.base_color = PERCENT_POSITIVE_DATA_COLOR;
    positive.verb_style = VerbStyle::CameBackPositive;

    let mut negative = new_tested_negative();
    negative.display = false;
    negative.verb_style = VerbStyle::CameBackPositive;

    let mut result = CompositeEvaluator::new(vec![positive, negative], Combiner::Quotient, true);
    result.title = "Positive rate".to_string();
    result.noun = "test positive rate".to_string();
    result.value_format = Some(ValueFormat::Percent { decimals: 1 });

    if smoothed {
        result = result.smoothed_copy();
    }
    if with_benchmark {
        result.benchmark = Some(Box::new(national_percent_positive().into()));
        result.benchmark_level = RegionLevel::Nation;
    }
    result
}

/// Nation-level benchmark variant of the positive rate, annotated at its
/// data maximum and drawn unfilled.
pub fn national_percent_positive() -> CompositeEvaluator {
    let mut result = percent_positive(true, false);
    let displayed = &mut result.children[0];
    displayed.title = "National Positive Rate".to_string();
    displayed.intensity.base_color = PERCENT_POSITIVE_BENCHMARK_COLOR;
    displayed.wants_fill = false;
    displayed.annotation = Some(Annotation {
        text: "National average".to_string(),
        placement: AnnotationPlacement::AtDataMax,
    });
    result
}

/// N-day relative change of a base metric's smoothed slot, formatted as a
/// signed percent with good/bad coloring.
fn stat_trend(base: &MetricEvaluator, days: u32, decimals: u8) -> MetricEvaluator {
    let mut result = base.clone();
    if let StatSource::Infection(field) = base.stat {
        result.stat = StatSource::Trend {
            field,
            delta: base.measure_delta,
            days,
        };
    } else {
        debug_assert!(false, "trend metrics derive from infection-backed bases");
    }
    result.title = format!("{days}-day change");
    result.display_as_percent = true;
    result.value_format = ValueFormat::SignedPercent { decimals };
    result.directional_html = true;
    result
}

pub fn case_trend(days: u32) -> MetricEvaluator {
    stat_trend(&new_confirmed_cases(), days, 0)
}

pub fn death_trend(days: u32) -> MetricEvaluator {
    stat_trend(&new_deaths(), days, 0)
}

pub fn hospitalized_trend(days: u32) -> MetricEvaluator {
    stat_trend(&currently_hospitalized(), days, 0)
}

pub fn test_trend(days: u32) -> MetricEvaluator {
    let mut result = stat_trend(&new_tests(), days, 0);
    result.up_is_better = true;
    result
}

/// N-day movement of the daily positive rate, in percentage points.
pub fn percent_positive_trend(days: u32) -> MetricEvaluator {
    let mut result = stat_trend(&new_tested_positive(), days, 1);
    result.stat = StatSource::PositiveRateTrend { days };
    result
}

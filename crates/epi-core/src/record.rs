// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::Observation;

/// Names the measured quantities of an [`InfectionRecord`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InfectionField {
    Cases,
    Deaths,
    Hospitalized,
    TotalTests,
    TestedPositive,
    TestedNegative,
}

/// Infection counts for one region-day. A `None` field reads as "not
/// reported" and evaluates to zero downstream.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InfectionRecord {
    pub cases: Option<Observation>,
    pub deaths: Option<Observation>,
    pub hospitalized: Option<Observation>,
    pub total_tests: Option<Observation>,
    pub tested_positive: Option<Observation>,
    pub tested_negative: Option<Observation>,
}

impl InfectionRecord {
    /// Record with no reported fields.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn stat(&self, field: InfectionField) -> Option<&Observation> {
        match field {
            InfectionField::Cases => self.cases.as_ref(),
            InfectionField::Deaths => self.deaths.as_ref(),
            InfectionField::Hospitalized => self.hospitalized.as_ref(),
            InfectionField::TotalTests => self.total_tests.as_ref(),
            InfectionField::TestedPositive => self.tested_positive.as_ref(),
            InfectionField::TestedNegative => self.tested_negative.as_ref(),
        }
    }

    /// Fraction of tests that came back positive, when computable.
    pub fn percent_positive(&self) -> Option<f64> {
        let total = self.total_tests?.value();
        if total == 0.0 {
            return None;
        }
        let positive = self.tested_positive?.value();
        Some(positive / total)
    }
}

/// Google-style mobility categories. Metric families cycle through these
/// in declaration order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MobilityCategory {
    RetailAndRecreation,
    Workplace,
    Transit,
    Parks,
    Residential,
}

impl MobilityCategory {
    pub const COUNT: usize = 5;

    pub const ALL: [Self; Self::COUNT] = [
        Self::RetailAndRecreation,
        Self::Workplace,
        Self::Transit,
        Self::Parks,
        Self::Residential,
    ];

    /// Category for a cycling index (wraps modulo [`Self::COUNT`]).
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::COUNT]
    }
}

/// Mobility change fractions for one region-day, one observation per
/// category; `None` reads as "not reported".
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MobilityRecord {
    pub retail_and_recreation: Option<Observation>,
    pub workplace: Option<Observation>,
    pub transit: Option<Observation>,
    pub parks: Option<Observation>,
    pub residential: Option<Observation>,
}

impl MobilityRecord {
    pub fn stat(&self, category: MobilityCategory) -> Option<&Observation> {
        match category {
            MobilityCategory::RetailAndRecreation => self.retail_and_recreation.as_ref(),
            MobilityCategory::Workplace => self.workplace.as_ref(),
            MobilityCategory::Transit => self.transit.as_ref(),
            MobilityCategory::Parks => self.parks.as_ref(),
            MobilityCategory::Residential => self.residential.as_ref(),
        }
    }
}

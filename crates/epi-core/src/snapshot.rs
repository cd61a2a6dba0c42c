// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::dates::day_string;
use crate::{InfectionRecord, MobilityRecord, Region};
use chrono::NaiveDate;
use std::sync::Arc;

/// One region's observed values for one calendar day.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub day: NaiveDate,
    pub region: Arc<Region>,
    pub infection: InfectionRecord,
    pub mobility: Option<MobilityRecord>,
}

impl Snapshot {
    pub fn new(day: NaiveDate, region: Arc<Region>, infection: InfectionRecord) -> Self {
        Self {
            day,
            region,
            infection,
            mobility: None,
        }
    }

    pub fn with_mobility(mut self, mobility: MobilityRecord) -> Self {
        self.mobility = Some(mobility);
        self
    }

    /// The `YYYY-MM-DD` key this snapshot is indexed under.
    pub fn day_key(&self) -> String {
        day_string(self.day)
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod dates;
pub mod error;
pub mod observation;
pub mod record;
pub mod region;
pub mod snapshot;
pub mod timeseries;

pub use dates::{DayShiftCache, day_string, days_between, parse_day};
pub use error::EpiError;
pub use observation::{Observation, StatKind};
pub use record::{InfectionField, InfectionRecord, MobilityCategory, MobilityRecord};
pub use region::{Region, RegionCatalog, RegionId, RegionLevel};
pub use snapshot::Snapshot;
pub use timeseries::{EvalContext, SnapshotMetric, TimeSeries};

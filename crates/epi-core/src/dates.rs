// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::EpiError;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` day key.
pub fn parse_day(key: &str) -> Result<NaiveDate, EpiError> {
    NaiveDate::parse_from_str(key, DAY_FORMAT)
        .map_err(|err| EpiError::invalid_input(format!("day key {key:?} is not YYYY-MM-DD: {err}")))
}

/// Formats a day as its `YYYY-MM-DD` key.
pub fn day_string(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Signed number of days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Memo cache for day-shift arithmetic.
///
/// Day lookups shift by the same handful of offsets (1, 7, 30 days) over a
/// small finite set of calendar days, once per user interaction. Entries are
/// keyed by exact `(day, shift)` input and never evicted for the life of the
/// owning series.
#[derive(Debug, Default)]
pub struct DayShiftCache {
    entries: Mutex<HashMap<(NaiveDate, i64), Option<NaiveDate>>>,
}

impl DayShiftCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `day + shift_days`, memoized. `None` only when the shifted day falls
    /// outside the representable calendar range.
    pub fn shifted(&self, day: NaiveDate, shift_days: i64) -> Option<NaiveDate> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *entries
            .entry((day, shift_days))
            .or_insert_with(|| day.checked_add_signed(chrono::Duration::days(shift_days)))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl Clone for DayShiftCache {
    fn clone(&self) -> Self {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        Self {
            entries: Mutex::new(entries),
        }
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::dates::DayShiftCache;
use crate::{Region, RegionCatalog, RegionId, Snapshot};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Evaluation context threaded through metric calls.
///
/// Carries the series a snapshot belongs to, for metrics that reach back in
/// time (trend metrics). Snapshots hold no back-pointer to their series;
/// callers that evaluate trend metrics pass the series here instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct EvalContext<'a> {
    pub series: Option<&'a TimeSeries>,
}

impl<'a> EvalContext<'a> {
    /// Context without a series; trend metrics evaluate to zero.
    pub fn detached() -> Self {
        Self { series: None }
    }

    pub fn with_series(series: &'a TimeSeries) -> Self {
        Self {
            series: Some(series),
        }
    }
}

/// Anything that maps a snapshot to a displayable number.
///
/// The seam between the data model and the evaluator layer: ranking and
/// chart assembly take `&dyn SnapshotMetric` without knowing evaluator
/// internals.
pub trait SnapshotMetric {
    fn value_for_snapshot(&self, snapshot: &Snapshot, ctx: &EvalContext<'_>) -> f64;
}

/// Day-indexed, region-indexed collection of snapshots.
#[derive(Clone, Debug, Default)]
pub struct TimeSeries {
    days: BTreeMap<NaiveDate, BTreeMap<RegionId, Snapshot>>,
    catalog: RegionCatalog,
    shift_cache: DayShiftCache,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a series from a flat snapshot list, registering every
    /// snapshot's region into the owned catalog.
    pub fn from_snapshots(snapshots: impl IntoIterator<Item = Snapshot>) -> Self {
        let mut series = Self::new();
        for snapshot in snapshots {
            series.insert(snapshot);
        }
        series
    }

    pub fn insert(&mut self, snapshot: Snapshot) {
        self.catalog.register_handle(Arc::clone(&snapshot.region));
        self.days
            .entry(snapshot.day)
            .or_default()
            .insert(snapshot.region.id.clone(), snapshot);
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut RegionCatalog {
        &mut self.catalog
    }

    /// All snapshots for one day, keyed by region id.
    pub fn data_for_day(&self, day: NaiveDate) -> Option<&BTreeMap<RegionId, Snapshot>> {
        self.days.get(&day)
    }

    pub fn snapshot_for(&self, day: NaiveDate, region_id: &str) -> Option<&Snapshot> {
        self.days.get(&day)?.get(region_id)
    }

    /// One region's snapshots in day order.
    pub fn data_slice_for_region(&self, region_id: &str) -> Vec<&Snapshot> {
        self.days
            .values()
            .filter_map(|by_region| by_region.get(region_id))
            .collect()
    }

    /// The same region's snapshot `n_days` earlier, when present.
    pub fn snapshot_preceding(&self, snapshot: &Snapshot, n_days: u32) -> Option<&Snapshot> {
        let day = self
            .shift_cache
            .shifted(snapshot.day, -i64::from(n_days))?;
        self.snapshot_for(day, &snapshot.region.id)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn num_days(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Sub-series between optional inclusive day bounds. The catalog is
    /// shared; the shift cache starts cold.
    pub fn range(&self, begin: Option<NaiveDate>, end: Option<NaiveDate>) -> TimeSeries {
        let days = self
            .days
            .iter()
            .filter(|(day, _)| begin.is_none_or(|b| **day >= b) && end.is_none_or(|e| **day <= e))
            .map(|(day, by_region)| (*day, by_region.clone()))
            .collect();
        TimeSeries {
            days,
            catalog: self.catalog.clone(),
            shift_cache: DayShiftCache::new(),
        }
    }

    pub fn beginning_at(&self, day: NaiveDate) -> TimeSeries {
        self.range(Some(day), None)
    }

    pub fn ending_at(&self, day: NaiveDate) -> TimeSeries {
        self.range(None, Some(day))
    }

    /// The day at `fraction` of the way through the covered range, rounded
    /// to a whole day.
    pub fn day_for_fraction_elapsed(&self, fraction: f64) -> Option<NaiveDate> {
        let first = self.first_day()?;
        let last = self.last_day()?;
        let span = (last - first).num_days() as f64;
        let offset = (span * fraction).round() as i64;
        first.checked_add_signed(chrono::Duration::days(offset))
    }

    /// Position of `day` within the covered range as a fraction in `[0,1]`
    /// for in-range days. A single-day range reads as `0.0`.
    pub fn fraction_elapsed_for_day(&self, day: NaiveDate) -> Option<f64> {
        let first = self.first_day()?;
        let last = self.last_day()?;
        let span = (last - first).num_days();
        if span == 0 {
            return Some(0.0);
        }
        Some((day - first).num_days() as f64 / span as f64)
    }

    /// Regions ranked by metric value on a day (the last day when `on_day`
    /// is `None`). Highest value first unless `ascending`; ties keep the
    /// day's region-id order. `n == 0` means no cap.
    pub fn top_regions(
        &self,
        n: usize,
        filter: Option<&dyn Fn(&Snapshot) -> bool>,
        metric: &dyn SnapshotMetric,
        ascending: bool,
        on_day: Option<NaiveDate>,
    ) -> Vec<Arc<Region>> {
        let Some(day) = on_day.or_else(|| self.last_day()) else {
            return Vec::new();
        };
        let Some(by_region) = self.data_for_day(day) else {
            return Vec::new();
        };

        let ctx = EvalContext::with_series(self);
        let mut ranked: Vec<(&Snapshot, f64)> = by_region
            .values()
            .filter(|snapshot| filter.is_none_or(|accepts| accepts(snapshot)))
            .map(|snapshot| (snapshot, metric.value_for_snapshot(snapshot, &ctx)))
            .collect();

        ranked.sort_by(|(_, a), (_, b)| {
            if ascending {
                a.total_cmp(b)
            } else {
                b.total_cmp(a)
            }
        });
        if n > 0 {
            ranked.truncate(n);
        }

        ranked
            .into_iter()
            .map(|(snapshot, _)| Arc::clone(&snapshot.region))
            .collect()
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

/// Slot selector for the derived variants of a measured quantity.
///
/// Two modifiers derive slots from [`StatKind::Value`]: `with_change`
/// selects the day-over-day delta, `with_average` the rolling average.
/// Each modifier stacks at most once and re-applying it is a no-op, so any
/// modifier sequence lands on one of the four slots and stays there.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatKind {
    /// The measured value itself.
    Value,
    /// Day-over-day delta of the value.
    Change,
    /// Rolling average of the day-over-day delta.
    ChangeRollingAverage,
    /// Rolling average of the value.
    RollingAverage,
}

impl StatKind {
    /// Number of backing slots in an [`Observation`].
    pub const COUNT: usize = 4;

    /// Applies the "change" modifier.
    pub fn with_change(self) -> Self {
        match self {
            Self::Value => Self::Change,
            Self::RollingAverage => Self::ChangeRollingAverage,
            other => other,
        }
    }

    /// Applies the "average" modifier.
    pub fn with_average(self) -> Self {
        match self {
            Self::Value => Self::RollingAverage,
            Self::Change => Self::ChangeRollingAverage,
            other => other,
        }
    }

    /// Resolves the slot for a delta/smoothing flag pair, starting from
    /// [`StatKind::Value`].
    pub fn for_transforms(measure_delta: bool, smoothed: bool) -> Self {
        let mut kind = Self::Value;
        if measure_delta {
            kind = kind.with_change();
        }
        if smoothed {
            kind = kind.with_average();
        }
        kind
    }

    fn slot(self) -> usize {
        match self {
            Self::Value => 0,
            Self::Change => 1,
            Self::ChangeRollingAverage => 2,
            Self::RollingAverage => 3,
        }
    }
}

/// One measured quantity together with its derived variants.
///
/// Fixed-shape value type over four numeric slots. Constructed once when a
/// per-day record is parsed (derived slots arrive pre-computed from the
/// aggregation step) and immutable thereafter. Absent or NaN inputs
/// normalize to `0.0`; the value slot is never NaN.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    slots: [f64; StatKind::COUNT],
}

impl Observation {
    /// Observation with only the value slot populated.
    pub fn new(value: f64) -> Self {
        let mut slots = [0.0; StatKind::COUNT];
        slots[StatKind::Value.slot()] = scrub(value);
        Self { slots }
    }

    /// Observation with all derived slots pre-computed.
    pub fn with_derived(
        value: f64,
        change: f64,
        change_rolling_average: f64,
        rolling_average: f64,
    ) -> Self {
        Self {
            slots: [
                scrub(value),
                scrub(change),
                scrub(change_rolling_average),
                scrub(rolling_average),
            ],
        }
    }

    /// Observation from an optional raw value; absent input reads as zero.
    pub fn from_optional(value: Option<f64>) -> Self {
        Self::new(value.unwrap_or(0.0))
    }

    pub fn get(&self, kind: StatKind) -> f64 {
        self.slots[kind.slot()]
    }

    pub fn value(&self) -> f64 {
        self.get(StatKind::Value)
    }

    pub fn change(&self) -> f64 {
        self.get(StatKind::Change)
    }

    pub fn change_rolling_average(&self) -> f64 {
        self.get(StatKind::ChangeRollingAverage)
    }

    pub fn rolling_average(&self) -> f64 {
        self.get(StatKind::RollingAverage)
    }
}

impl Default for Observation {
    fn default() -> Self {
        Self::new(0.0)
    }
}

fn scrub(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value }
}

#[cfg(test)]
mod tests {
    use super::{Observation, StatKind};

    #[test]
    fn modifiers_compose_to_a_distinct_slot() {
        let composed = StatKind::Value.with_change().with_average();
        assert_eq!(composed, StatKind::ChangeRollingAverage);
        assert_ne!(composed, StatKind::Value.with_change());
        assert_ne!(composed, StatKind::Value.with_average());
    }

    #[test]
    fn modifiers_commute_and_are_idempotent() {
        let via_change_first = StatKind::Value.with_change().with_average();
        let via_average_first = StatKind::Value.with_average().with_change();
        assert_eq!(via_change_first, via_average_first);

        assert_eq!(via_change_first.with_change(), via_change_first);
        assert_eq!(via_change_first.with_average(), via_change_first);
        assert_eq!(StatKind::Change.with_change(), StatKind::Change);
        assert_eq!(
            StatKind::RollingAverage.with_average(),
            StatKind::RollingAverage
        );
    }

    #[test]
    fn for_transforms_covers_all_flag_pairs() {
        assert_eq!(StatKind::for_transforms(false, false), StatKind::Value);
        assert_eq!(StatKind::for_transforms(true, false), StatKind::Change);
        assert_eq!(
            StatKind::for_transforms(false, true),
            StatKind::RollingAverage
        );
        assert_eq!(
            StatKind::for_transforms(true, true),
            StatKind::ChangeRollingAverage
        );
    }

    #[test]
    fn nan_and_absent_inputs_normalize_to_zero() {
        assert_eq!(Observation::new(f64::NAN).value(), 0.0);
        assert_eq!(Observation::from_optional(None).value(), 0.0);
        assert_eq!(
            Observation::with_derived(1.0, f64::NAN, 2.0, 3.0).change(),
            0.0
        );
    }

    #[test]
    fn named_accessors_read_their_slots() {
        let obs = Observation::with_derived(100.0, 12.0, 9.5, 88.0);
        assert_eq!(obs.value(), 100.0);
        assert_eq!(obs.change(), 12.0);
        assert_eq!(obs.change_rolling_average(), 9.5);
        assert_eq!(obs.rolling_average(), 88.0);
        assert_eq!(obs.get(StatKind::for_transforms(true, true)), 9.5);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn observation_serde_roundtrip() {
        let obs = Observation::with_derived(4.0, 1.0, 0.5, 3.5);
        let encoded = serde_json::to_string(&obs).expect("observation should serialize");
        let decoded: Observation =
            serde_json::from_str(&encoded).expect("observation should deserialize");
        assert_eq!(decoded, obs);
    }
}

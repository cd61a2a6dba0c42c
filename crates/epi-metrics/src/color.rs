// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use std::fmt;

pub const CASE_DATA_COLOR: Rgb = Rgb::new(203, 25, 29);
pub const DEATH_DATA_COLOR: Rgb = Rgb::new(47, 42, 45);
pub const HOSPITALIZED_DATA_COLOR: Rgb = Rgb::new(240, 135, 0);
pub const TEST_DATA_COLOR: Rgb = Rgb::new(38, 120, 144);
pub const PERCENT_POSITIVE_DATA_COLOR: Rgb = Rgb::new(137, 42, 98);
pub const PERCENT_POSITIVE_BENCHMARK_COLOR: Rgb = Rgb::new(201, 79, 150);
pub const MOBILITY_DATA_COLOR: Rgb = Rgb::new(131, 182, 146);
pub const MOBILITY_DARK_COLOR: Rgb = Rgb::new(49, 84, 71);

/// Opaque base color of a metric family.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pairs the color with an alpha, clamped to `[0, 1]`.
    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba {
            rgb: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

/// A resolved display color; renders as a CSS `rgba(...)` string.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({},{},{},{})",
            self.rgb.r, self.rgb.g, self.rgb.b, self.alpha
        )
    }
}

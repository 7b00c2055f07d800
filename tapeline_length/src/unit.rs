// Copyright 2025 the Tapeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::str::FromStr;

use crate::{PIXELS_PER_CENTIMETER, PIXELS_PER_INCH};

/// Physical unit of measure shown on a ruler.
///
/// The unit fixes both the pixel scale and the graduation pattern. Each unit
/// is divided into ten minor ticks; the "half" tick that is drawn taller than
/// the others recurs every 5th tick for centimeters and every 2nd tick for
/// inches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Unit {
    /// Metric centimeters.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "cm"))]
    Centimeter,
    /// Imperial inches.
    #[cfg_attr(feature = "serde", serde(alias = "in"))]
    Inch,
}

impl Unit {
    /// Number of minor divisions drawn per unit.
    pub const DIVISIONS: u32 = 10;

    /// Returns the fixed pixel width of one unit.
    #[inline]
    #[must_use]
    pub const fn pixels_per_unit(self) -> f64 {
        match self {
            Self::Centimeter => PIXELS_PER_CENTIMETER,
            Self::Inch => PIXELS_PER_INCH,
        }
    }

    /// Converts a length in this unit to pixels.
    #[inline]
    #[must_use]
    pub fn to_pixels(self, value: f64) -> f64 {
        match self {
            Self::Centimeter => crate::pixels_from_centimeter(value),
            Self::Inch => crate::pixels_from_inch(value),
        }
    }

    /// Converts a pixel offset to a length in this unit.
    #[inline]
    #[must_use]
    pub fn from_pixels(self, pixels: f64) -> f64 {
        match self {
            Self::Centimeter => crate::centimeter_from_pixels(pixels),
            Self::Inch => crate::inch_from_pixels(pixels),
        }
    }

    /// Minor tick interval at which the taller "half" tick recurs.
    #[inline]
    #[must_use]
    pub const fn half_tick_every(self) -> u32 {
        match self {
            Self::Centimeter => 5,
            Self::Inch => 2,
        }
    }

    /// Short symbol for the unit (`cm` / `in`).
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Centimeter => "cm",
            Self::Inch => "in",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Centimeter => "centimeter",
            Self::Inch => "inch",
        })
    }
}

/// Error returned when parsing a [`Unit`] from text fails.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown length unit (expected `centimeter`, `cm`, `inch` or `in`)")]
pub struct ParseUnitError;

impl FromStr for Unit {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if ["cm", "centimeter", "centimeters", "centimetre", "centimetres"]
            .iter()
            .any(|name| s.eq_ignore_ascii_case(name))
        {
            Ok(Self::Centimeter)
        } else if ["in", "inch", "inches"]
            .iter()
            .any(|name| s.eq_ignore_ascii_case(name))
        {
            Ok(Self::Inch)
        } else {
            Err(ParseUnitError)
        }
    }
}

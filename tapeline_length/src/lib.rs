// Copyright 2025 the Tapeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tapeline Length: physical units, pixel scale, and value quantization.
//!
//! This crate is the leaf of the Tapeline stack. It provides:
//! - The two supported physical units ([`Unit::Centimeter`], [`Unit::Inch`]).
//! - Fixed pixel scale constants and conversion helpers between physical
//!   lengths and pixel offsets.
//! - Quantization helpers that snap a raw value onto a grid while keeping it
//!   inside `[0, max]`.
//!
//! Conversions are plain multiplications and never fail: negative lengths map
//! to negative pixel offsets and vice versa. Bounding happens in the layers
//! that own a value (see [`quantize`] and [`clamp_value`]).
//!
//! ## Minimal example
//!
//! ```rust
//! use tapeline_length::{Unit, pixels_from_centimeter, quantize, COARSE_GRID};
//!
//! assert_eq!(pixels_from_centimeter(2.5), 250.0);
//! assert_eq!(Unit::Inch.to_pixels(1.0), 80.0);
//!
//! // 534 px on a centimeter ruler is 5.34 cm, which snaps to 5.3 on the coarse grid.
//! let raw = Unit::Centimeter.from_pixels(534.0);
//! let snapped = quantize(raw, COARSE_GRID, 20.0);
//! assert!((snapped - 5.3).abs() < 1e-9);
//! ```
//!
//! ## Scale
//!
//! The scale constants ([`PIXELS_PER_CENTIMETER`], [`PIXELS_PER_INCH`]) are
//! logical pixels, not device-calibrated physical sizes. They were picked so
//! both units show a comparable, legible tick spacing; all ruler geometry is
//! derived from them.
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod quantize;
mod unit;

pub use quantize::{COARSE_GRID, clamp_value, quantize};
pub use unit::{ParseUnitError, Unit};

/// Logical pixels per centimeter.
pub const PIXELS_PER_CENTIMETER: f64 = 100.0;

/// Logical pixels per inch.
pub const PIXELS_PER_INCH: f64 = 80.0;

/// Converts a length in inches to pixels.
#[inline]
#[must_use]
pub fn pixels_from_inch(value: f64) -> f64 {
    value * PIXELS_PER_INCH
}

/// Converts a length in centimeters to pixels.
#[inline]
#[must_use]
pub fn pixels_from_centimeter(value: f64) -> f64 {
    value * PIXELS_PER_CENTIMETER
}

/// Converts a pixel offset to inches.
#[inline]
#[must_use]
pub fn inch_from_pixels(pixels: f64) -> f64 {
    pixels / PIXELS_PER_INCH
}

/// Converts a pixel offset to centimeters.
#[inline]
#[must_use]
pub fn centimeter_from_pixels(pixels: f64) -> f64 {
    pixels / PIXELS_PER_CENTIMETER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_use_fixed_scale() {
        assert_eq!(pixels_from_centimeter(1.0), 100.0);
        assert_eq!(pixels_from_inch(1.0), 80.0);
        assert_eq!(centimeter_from_pixels(250.0), 2.5);
        assert_eq!(inch_from_pixels(40.0), 0.5);
    }

    #[test]
    fn negative_inputs_are_not_rejected() {
        assert_eq!(pixels_from_centimeter(-3.0), -300.0);
        assert_eq!(inch_from_pixels(-160.0), -2.0);
    }

    #[test]
    fn conversions_are_inverse() {
        for v in [0.0, 0.1, 1.0, 5.34, 12.75, 19.9] {
            let cm = centimeter_from_pixels(pixels_from_centimeter(v));
            let inch = inch_from_pixels(pixels_from_inch(v));
            assert!((cm - v).abs() < 1e-12, "centimeter round trip for {v}");
            assert!((inch - v).abs() < 1e-12, "inch round trip for {v}");
        }
    }
}

// Copyright 2025 the Tapeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `round`

/// Fixed grid used while a gesture is still in progress.
///
/// Live values snap to tenths regardless of the configured step so the
/// readout does not jitter at sub-tenth granularity during fast scrolling.
pub const COARSE_GRID: f64 = 0.1;

/// Relative tolerance used to absorb floating-point noise at the upper bound.
const BOUND_EPSILON: f64 = 1e-9;

/// Clamps `value` into `[0, max]`.
///
/// `NaN` maps to `0`, and a negative `max` is treated as `0`.
#[inline]
#[must_use]
pub fn clamp_value(value: f64, max: f64) -> f64 {
    let max = max.max(0.0);
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max)
}

/// Snaps `value` to the nearest multiple of `grid` inside `[0, max]`.
///
/// Rounding is half away from zero, which is round-half-up for the
/// non-negative domain: `3.25` on a `0.5` grid becomes `3.5`.
///
/// When the nearest multiple lies above `max` (for example `max = 10.3` on a
/// `0.5` grid) the largest multiple not exceeding `max` is used instead, so the
/// result is always both on the grid and in range. Overshoot that is only
/// floating-point noise (`200 × 0.1` against `20`) resolves to `max` itself.
///
/// A non-positive or non-finite `grid` disables snapping and only clamps.
#[must_use]
pub fn quantize(value: f64, grid: f64, max: f64) -> f64 {
    let max = max.max(0.0);
    let bounded = clamp_value(value, max);
    if !(grid > 0.0 && grid.is_finite()) {
        return bounded;
    }

    let mut steps = (bounded / grid).round();
    let mut snapped = grid_multiple(steps, grid);
    if snapped > max {
        if snapped - max <= BOUND_EPSILON * max.max(1.0) {
            return max;
        }
        steps -= 1.0;
        snapped = grid_multiple(steps, grid);
    }
    snapped.max(0.0)
}

/// `steps × grid`, divided by the grid's integral inverse when it has one so
/// that decimal grids land on the nearest representable value (`53 / 10` is
/// exactly `5.3`, while `53 × 0.1` is not).
fn grid_multiple(steps: f64, grid: f64) -> f64 {
    let inverse = 1.0 / grid;
    let whole = inverse.round();
    if whole >= 1.0 && (inverse - whole).abs() <= BOUND_EPSILON * whole {
        steps / whole
    } else {
        steps * grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_multiple_of(value: f64, grid: f64) -> bool {
        let steps = value / grid;
        (steps - steps.round()).abs() < 1e-6
    }

    #[test]
    fn clamp_handles_out_of_range_and_nan() {
        assert_eq!(clamp_value(-5.0, 20.0), 0.0);
        assert_eq!(clamp_value(25.0, 20.0), 20.0);
        assert_eq!(clamp_value(7.5, 20.0), 7.5);
        assert_eq!(clamp_value(f64::NAN, 20.0), 0.0);
        assert_eq!(clamp_value(3.0, -1.0), 0.0);
    }

    #[test]
    fn coarse_grid_snaps_to_tenths() {
        assert_eq!(quantize(5.34, COARSE_GRID, 20.0), 5.3);
        assert_eq!(quantize(5.36, COARSE_GRID, 20.0), 5.4);
        assert_eq!(quantize(0.04, COARSE_GRID, 20.0), 0.0);
        assert_eq!(quantize(12.25, 0.25, 20.0), 12.25);
    }

    #[test]
    fn ties_round_up() {
        assert_eq!(quantize(3.25, 0.5, 10.0), 3.5);
        assert_eq!(quantize(3.2, 0.5, 10.0), 3.0);
        assert_eq!(quantize(3.3, 0.5, 10.0), 3.5);
    }

    #[test]
    fn upper_bound_noise_resolves_to_max() {
        assert_eq!(quantize(20.0, COARSE_GRID, 20.0), 20.0);
        assert_eq!(quantize(99.0, COARSE_GRID, 20.0), 20.0);
        // 3 * 1.1 is 3.3000000000000003 in binary floating point.
        assert_eq!(quantize(99.0, 1.1, 3.3), 3.3);
    }

    #[test]
    fn overshoot_falls_back_to_lower_multiple() {
        let v = quantize(10.3, 0.5, 10.3);
        assert_eq!(v, 10.0);
        assert!(is_multiple_of(v, 0.5));
    }

    #[test]
    fn results_stay_on_grid_and_in_range() {
        for grid in [0.1, 0.25, 0.5, 1.0, 0.3] {
            let max = 12.7;
            let mut raw = -1.0;
            while raw < 14.0 {
                let q = quantize(raw, grid, max);
                assert!((0.0..=max).contains(&q), "{q} out of range for grid {grid}");
                assert!(
                    is_multiple_of(q, grid) || q == max,
                    "{q} not on grid {grid}"
                );
                raw += 0.037;
            }
        }
    }

    #[test]
    fn degenerate_grid_only_clamps() {
        assert_eq!(quantize(4.321, 0.0, 10.0), 4.321);
        assert_eq!(quantize(-1.0, f64::NAN, 10.0), 0.0);
    }
}

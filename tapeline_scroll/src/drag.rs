// Copyright 2025 the Tapeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Horizontal drag tracking: movement deltas and release velocity.
//!
//! ## Usage
//!
//! 1) Start a drag with [`DragState::start`] at the initial pointer X and timestamp.
//! 2) On each move call [`DragState::update`] to get the delta since the last update.
//! 3) On release read [`DragState::release_velocity`] and call [`DragState::end`].
//!
//! ```
//! use tapeline_scroll::drag::DragState;
//!
//! let mut drag = DragState::default();
//! drag.start(100.0, 0.0);
//! assert_eq!(drag.update(90.0, 16.0), Some(-10.0));
//! assert!(drag.velocity() < 0.0);
//! ```

/// Smoothing factor applied to instantaneous velocity samples.
const VELOCITY_SMOOTHING: f64 = 0.3;

/// Samples further apart than this (in milliseconds) are not used for velocity.
const MAX_SAMPLE_GAP_MS: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    x: f64,
    time_ms: f64,
}

/// Tracks a single-axis drag and a smoothed pointer velocity in px/s.
#[derive(Debug, Clone, Default, Copy, PartialEq)]
pub struct DragState {
    last: Option<Sample>,
    velocity: f64,
}

impl DragState {
    /// Start tracking a new drag from `x` at `time_ms`.
    ///
    /// Any previous drag and its velocity are discarded.
    pub fn start(&mut self, x: f64, time_ms: f64) {
        self.last = Some(Sample { x, time_ms });
        self.velocity = 0.0;
    }

    /// Record a new pointer X, returning the delta since the last update.
    ///
    /// Returns `None` when no drag is active.
    pub fn update(&mut self, x: f64, time_ms: f64) -> Option<f64> {
        let last = self.last?;
        let delta = x - last.x;

        let dt_ms = time_ms - last.time_ms;
        if dt_ms > 0.0 && dt_ms < MAX_SAMPLE_GAP_MS {
            let instant = delta / (dt_ms / 1000.0);
            self.velocity =
                self.velocity * (1.0 - VELOCITY_SMOOTHING) + instant * VELOCITY_SMOOTHING;
        }

        self.last = Some(Sample { x, time_ms });
        Some(delta)
    }

    /// Smoothed pointer velocity in px/s.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Velocity to hand to momentum scrolling when the pointer lifts at `time_ms`.
    ///
    /// A pointer that rested for longer than `rest_ms` before lifting releases
    /// with zero velocity.
    pub fn release_velocity(&self, time_ms: f64, rest_ms: f64) -> f64 {
        match self.last {
            Some(last) if time_ms - last.time_ms > rest_ms => 0.0,
            _ => self.velocity,
        }
    }

    /// End the current drag and reset state.
    pub fn end(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_returns_none_when_not_dragging() {
        let mut drag = DragState::default();
        assert_eq!(drag.update(15.0, 10.0), None);
        assert_eq!(drag, DragState::default());
    }

    #[test]
    fn multiple_updates_track_incremental_deltas() {
        let mut drag = DragState::default();
        drag.start(0.0, 0.0);
        assert_eq!(drag.update(5.0, 16.0), Some(5.0));
        assert_eq!(drag.update(8.0, 32.0), Some(3.0));
        assert_eq!(drag.update(6.0, 48.0), Some(-2.0));
    }

    #[test]
    fn velocity_is_smoothed() {
        let mut drag = DragState::default();
        drag.start(0.0, 0.0);
        // 10 px in 10 ms is 1000 px/s; the first sample contributes 30%.
        drag.update(10.0, 10.0);
        assert!((drag.velocity() - 300.0).abs() < 1e-9);
        drag.update(20.0, 20.0);
        assert!((drag.velocity() - 510.0).abs() < 1e-9);
    }

    #[test]
    fn stale_samples_do_not_change_velocity() {
        let mut drag = DragState::default();
        drag.start(0.0, 0.0);
        drag.update(10.0, 10.0);
        let before = drag.velocity();
        drag.update(500.0, 2_000.0);
        assert_eq!(drag.velocity(), before);
    }

    #[test]
    fn resting_pointer_releases_without_velocity() {
        let mut drag = DragState::default();
        drag.start(0.0, 0.0);
        drag.update(-50.0, 16.0);
        assert!(drag.release_velocity(20.0, 100.0) < 0.0);
        assert_eq!(drag.release_velocity(400.0, 100.0), 0.0);
    }

    #[test]
    fn end_resets_drag_state() {
        let mut drag = DragState::default();
        drag.start(10.0, 0.0);
        drag.update(15.0, 16.0);
        drag.end();
        assert_eq!(drag, DragState::default());
        assert_eq!(drag.update(20.0, 32.0), None);
    }

    #[test]
    fn start_overwrites_previous_drag() {
        let mut drag = DragState::default();
        drag.start(0.0, 0.0);
        drag.update(10.0, 16.0);
        drag.start(50.0, 100.0);
        assert_eq!(drag.velocity(), 0.0);
        assert_eq!(drag.update(55.0, 116.0), Some(5.0));
    }
}

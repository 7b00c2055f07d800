// Copyright 2025 the Tapeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use tapeline_length::Unit;

/// Default value step: one tenth of a unit.
pub const DEFAULT_STEP: f64 = 0.1;

/// Default tick stroke width in pixels.
pub const DEFAULT_LINE_WIDTH: f64 = 1.0;

/// Construction parameters for a [`RulerControl`](crate::RulerControl).
///
/// The configuration is fixed for the lifetime of a control. Build it with
/// [`RulerConfig::new`] and the `with_*` methods; it is validated when the
/// control is created.
///
/// With the `serde` feature the configuration can be deserialized. `step` and
/// `line_width` fall back to their defaults when absent, and the result goes
/// through the same validation as a hand-built value.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RulerConfig {
    unit: Unit,
    length: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_step"))]
    step: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_line_width"))]
    line_width: f64,
}

#[cfg(feature = "serde")]
fn default_step() -> f64 {
    DEFAULT_STEP
}

#[cfg(feature = "serde")]
fn default_line_width() -> f64 {
    DEFAULT_LINE_WIDTH
}

impl RulerConfig {
    /// A ruler `length` units long with the default step and line width.
    #[must_use]
    pub fn new(unit: Unit, length: f64) -> Self {
        Self {
            unit,
            length,
            step: DEFAULT_STEP,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }

    /// Sets the grid that settled values snap to.
    #[must_use]
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Sets the tick stroke width in pixels.
    #[must_use]
    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    /// Unit of measure.
    #[must_use]
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Ruler length in units; also the largest selectable value.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Settle grid.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Tick stroke width in pixels.
    #[must_use]
    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Checks that every parameter is usable.
    pub fn validate(&self) -> Result<(), RulerConfigError> {
        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(RulerConfigError::InvalidLength(self.length));
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(RulerConfigError::InvalidStep(self.step));
        }
        if !(self.line_width.is_finite() && self.line_width >= 0.0) {
            return Err(RulerConfigError::InvalidLineWidth(self.line_width));
        }
        Ok(())
    }
}

/// Rejected [`RulerConfig`] parameter.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum RulerConfigError {
    /// Length must be finite and greater than zero.
    #[error("ruler length must be finite and positive, got {0}")]
    InvalidLength(f64),
    /// Step must be finite and greater than zero.
    #[error("value step must be finite and positive, got {0}")]
    InvalidStep(f64),
    /// Line width must be finite and not negative.
    #[error("line width must be finite and non-negative, got {0}")]
    InvalidLineWidth(f64),
}

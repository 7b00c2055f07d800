// Copyright 2025 the Tapeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tapeline Ruler: a headless, scrollable ruler picker.
//!
//! A horizontally scrolling tape marked in centimeters or inches. Dragging the
//! tape moves it under a fixed read-head; the control reports the value under
//! the read-head, snapping it to a configurable step once motion settles.
//!
//! The crate is split into three layers:
//!
//! - [`tick_cell`]: graduation marks for one unit, recorded once as a picture.
//! - [`surface`]: the full strip, tiling the cell once per unit and placing
//!   numerals under the whole-unit ticks.
//! - [`control`]: the picker itself, combining the strip with a
//!   [`ScrollViewport`](tapeline_scroll::ScrollViewport), a read-head, and
//!   value-change subscriptions.
//!
//! Rendering goes through the `tapeline_imaging` IR, so any
//! [`ImagingBackend`](tapeline_imaging::ImagingBackend) can display it.
//! Text is left to the host; [`RulerSurface::labels`] says where numerals go.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use tapeline_length::Unit;
//! use tapeline_ruler::{RulerConfig, RulerControl};
//!
//! let mut ruler = RulerControl::new(RulerConfig::new(Unit::Inch, 10.0).with_step(0.5))?;
//! ruler.set_view_width(320.0);
//!
//! let last = Rc::new(Cell::new(f64::NAN));
//! let sink = Rc::clone(&last);
//! ruler.subscribe(move |v| sink.set(v));
//!
//! // Drag the tape 256 px to the left and hold still before lifting.
//! ruler.begin_drag(300.0, 0.0);
//! ruler.drag_to(44.0, 600.0);
//! ruler.end_drag(1200.0);
//! while ruler.tick(1.0 / 60.0) {}
//!
//! assert_eq!(ruler.value(), 3.0);
//! assert_eq!(last.get(), 3.0);
//! # Ok::<(), tapeline_ruler::RulerConfigError>(())
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod control;
pub mod surface;
pub mod tick_cell;

mod config;

pub use config::{DEFAULT_LINE_WIDTH, DEFAULT_STEP, RulerConfig, RulerConfigError};
pub use control::{RulerControl, RulerDebugInfo, SubscriptionId};
pub use surface::{Label, Labels, RulerSurface};
pub use tick_cell::{Tick, TickCell};

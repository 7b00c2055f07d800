// Copyright 2025 the Tapeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tapeline Scroll: a headless, single-axis scroll viewport.
//!
//! This crate models the scroll container underneath a horizontal scroller:
//! a view of fixed width over wider content, a clamped content offset, drag
//! tracking with release velocity, momentum with linear friction, and eased
//! programmatic scrolls.
//!
//! Nothing here renders or owns a clock. Hosts feed pointer samples and frame
//! ticks in, and read an ordered queue of [`ScrollEvent`]s out:
//!
//! - [`ScrollEvent::ScrollChanged`] whenever the offset moves, tagged with a
//!   [`ScrollSource`].
//! - [`ScrollEvent::DragEnded`] when the pointer lifts, reporting whether
//!   momentum follows.
//! - [`ScrollEvent::DecelerationEnded`] when momentum comes to rest.
//! - [`ScrollEvent::ScrollAnimationEnded`] when an animated
//!   [`ScrollViewport::scroll_to`] completes.
//!
//! ## Example
//!
//! ```rust
//! use tapeline_scroll::{ScrollConfig, ScrollEvent, ScrollSource, ScrollViewport};
//!
//! let mut vp = ScrollViewport::new(300.0, 1300.0, ScrollConfig::default());
//! vp.begin_drag(200.0, 0.0);
//! vp.drag_to(150.0, 500.0);
//! vp.end_drag(1000.0);
//!
//! let events: Vec<_> = vp.drain_events().collect();
//! assert_eq!(
//!     events,
//!     [
//!         ScrollEvent::ScrollChanged { offset: 50.0, source: ScrollSource::Drag },
//!         ScrollEvent::DragEnded { will_decelerate: false },
//!     ]
//! );
//! ```
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod drag;
mod viewport;

pub use viewport::{ScrollViewport, ScrollViewportDebugInfo};

/// Tuning for drag release, momentum, and animated scrolls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollConfig {
    /// Linear friction applied to momentum, in px/s².
    pub deceleration: f64,
    /// Momentum below this speed (px/s) stops.
    pub velocity_threshold: f64,
    /// Largest release velocity handed to momentum, in px/s.
    pub max_fling_velocity: f64,
    /// Duration of an animated [`ScrollViewport::scroll_to`], in seconds.
    pub animation_duration: f64,
    /// A pointer resting longer than this (ms) before lifting releases without momentum.
    pub rest_ms: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            deceleration: 1500.0,
            velocity_threshold: 10.0,
            max_fling_velocity: 8000.0,
            animation_duration: 0.3,
            rest_ms: 100.0,
        }
    }
}

/// What the viewport is currently doing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollPhase {
    /// At rest.
    #[default]
    Idle,
    /// A pointer drag is in progress.
    Dragging,
    /// Coasting on release momentum.
    Decelerating,
    /// Running an eased programmatic scroll.
    Animating,
}

/// What moved the offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollSource {
    /// A pointer drag.
    Drag,
    /// Release momentum.
    Momentum,
    /// An animated programmatic scroll.
    Animation,
    /// An immediate programmatic scroll or a resize.
    Programmatic,
}

impl ScrollSource {
    /// Returns `true` for movement caused directly or indirectly by the user.
    #[must_use]
    pub fn is_user_driven(self) -> bool {
        matches!(self, Self::Drag | Self::Momentum)
    }
}

/// Observable viewport change, queued in the order it happened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollEvent {
    /// The content offset moved.
    ScrollChanged {
        /// New content offset.
        offset: f64,
        /// What moved it.
        source: ScrollSource,
    },
    /// The pointer lifted.
    DragEnded {
        /// `true` when momentum follows.
        will_decelerate: bool,
    },
    /// Momentum came to rest.
    DecelerationEnded,
    /// An animated scroll reached its target.
    ScrollAnimationEnded,
}

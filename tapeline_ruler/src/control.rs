// Copyright 2025 the Tapeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ruler picker: a scroll viewport over a [`RulerSurface`] with a fixed
//! read-head.
//!
//! The surface's leading edge sits at the horizontal centre of the view when
//! the offset is zero, so the read-head indicator always points at
//! `value = unit.from_pixels(offset)`.
//!
//! While the content moves under a drag or momentum the value follows on a
//! coarse tenth-of-a-unit grid. When motion settles the value snaps to the
//! configured step and the content glides so the read-head sits exactly on it.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Vec2;
use peniko::{Brush, Color};
use smallvec::SmallVec;
use tapeline_imaging::{
    Affine, DrawOp, ImagingBackend, ImagingBackendExt, PaintDesc, PaintId, RectF, ResourceBackend,
    RoundedRectF, StateOp,
};
use tapeline_length::{COARSE_GRID, Unit, clamp_value, quantize};
use tapeline_scroll::{ScrollConfig, ScrollEvent, ScrollPhase, ScrollViewport};

use crate::config::{RulerConfig, RulerConfigError};
use crate::surface::RulerSurface;

/// Read-head width.
pub const INDICATOR_WIDTH: f64 = 5.0;
/// Read-head height.
pub const INDICATOR_HEIGHT: f64 = 45.0;
/// Read-head corner radius.
pub const INDICATOR_CORNER_RADIUS: f64 = 2.5;
/// Read-head top edge relative to the control's top edge.
pub const INDICATOR_TOP: f64 = -2.0;
/// Height of the scrolling area.
pub const SCROLL_VIEW_HEIGHT: f64 = 96.0;

/// Handle returned by [`RulerControl::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type ValueHandler = Box<dyn FnMut(f64)>;

/// A scrollable ruler that reports a stepped value.
///
/// Drive it with pointer samples ([`begin_drag`](Self::begin_drag),
/// [`drag_to`](Self::drag_to), [`end_drag`](Self::end_drag)) and frame ticks
/// ([`tick`](Self::tick)). Value changes are pushed to subscribers in
/// subscription order, once per actual change.
pub struct RulerControl {
    config: RulerConfig,
    surface: RulerSurface,
    viewport: ScrollViewport,
    value: f64,
    subscribers: Vec<(SubscriptionId, ValueHandler)>,
    next_subscription: u64,
    indicator_paint: Option<PaintId>,
}

impl fmt::Debug for RulerControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RulerControl")
            .field("config", &self.config)
            .field("surface", &self.surface)
            .field("viewport", &self.viewport)
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .field("next_subscription", &self.next_subscription)
            .field("indicator_paint", &self.indicator_paint)
            .finish()
    }
}

impl RulerControl {
    /// Creates a control at value `0` with default scroll tuning.
    ///
    /// The view starts twice as wide as the ruler strip; hosts normally call
    /// [`set_view_width`](Self::set_view_width) once their layout is known.
    pub fn new(config: RulerConfig) -> Result<Self, RulerConfigError> {
        Self::with_scroll_config(config, ScrollConfig::default())
    }

    /// Creates a control with custom scroll tuning.
    pub fn with_scroll_config(
        config: RulerConfig,
        scroll: ScrollConfig,
    ) -> Result<Self, RulerConfigError> {
        config.validate()?;
        let surface = RulerSurface::new(config.unit(), config.length(), config.line_width());
        let view_width = surface.width() * 2.0;
        let viewport = ScrollViewport::new(view_width, view_width + surface.width(), scroll);
        tracing::debug!(
            unit = %config.unit(),
            length = config.length(),
            step = config.step(),
            "ruler control created"
        );
        let mut control = Self {
            config,
            surface,
            viewport,
            value: 0.0,
            subscribers: Vec::new(),
            next_subscription: 0,
            indicator_paint: None,
        };
        control.attach();
        Ok(control)
    }

    /// The configuration the control was built with.
    #[must_use]
    pub fn config(&self) -> &RulerConfig {
        &self.config
    }

    /// Unit of measure.
    #[must_use]
    pub fn unit(&self) -> Unit {
        self.config.unit()
    }

    /// The ruler strip.
    #[must_use]
    pub fn surface(&self) -> &RulerSurface {
        &self.surface
    }

    /// The underlying scroll viewport.
    #[must_use]
    pub fn viewport(&self) -> &ScrollViewport {
        &self.viewport
    }

    /// Current value, always within `[0, length]`.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Current content offset.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.viewport.offset()
    }

    /// Current view width.
    #[must_use]
    pub fn view_width(&self) -> f64 {
        self.viewport.view_width()
    }

    /// Sets the value, clamped to `[0, length]`, and moves the ruler to it.
    ///
    /// Subscribers are not notified. An animated move settles when it
    /// finishes, which may snap the value to the step and notify then.
    pub fn set_value(&mut self, value: f64, animated: bool) {
        self.value = clamp_value(value, self.config.length());
        tracing::debug!(value = self.value, animated, "value set");
        self.viewport
            .scroll_to(self.offset_from_value(self.value), animated);
        self.process_events();
    }

    /// Registers `handler` for value changes.
    pub fn subscribe(&mut self, handler: impl FnMut(f64) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Removes a handler. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Color of the ticks and numerals.
    #[must_use]
    pub fn tint(&self) -> Color {
        self.surface.tint()
    }

    /// Recolors the ruler strip. The read-head keeps its own color.
    pub fn set_tint(&mut self, color: Color) {
        self.surface.set_tint(color);
    }

    /// Re-applies layout for the current view width.
    ///
    /// Content spans the view plus the strip, and the offset is re-synced to
    /// the current value without animation.
    pub fn attach(&mut self) {
        self.layout(self.viewport.view_width());
    }

    /// Changes the view width and re-applies layout.
    pub fn set_view_width(&mut self, width: f64) {
        self.layout(width);
    }

    /// Pointer down at view-space `x`.
    pub fn begin_drag(&mut self, x: f64, time_ms: f64) {
        self.viewport.begin_drag(x, time_ms);
        self.process_events();
    }

    /// Pointer moved to view-space `x`.
    pub fn drag_to(&mut self, x: f64, time_ms: f64) {
        self.viewport.drag_to(x, time_ms);
        self.process_events();
    }

    /// Pointer lifted.
    pub fn end_drag(&mut self, time_ms: f64) {
        self.viewport.end_drag(time_ms);
        self.process_events();
    }

    /// Advances momentum and animations by `dt` seconds.
    ///
    /// Returns `true` while the ruler is still moving on its own.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.viewport.tick(dt);
        self.process_events();
        self.viewport.is_animating()
    }

    /// Returns `true` while the ruler is moving without input.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.viewport.is_animating()
    }

    /// Value under the read-head at content offset `offset`, clamped to
    /// `[0, length]` but not snapped.
    #[must_use]
    pub fn value_from_offset(&self, offset: f64) -> f64 {
        clamp_value(self.unit().from_pixels(offset), self.config.length())
    }

    /// Content offset that puts `value` (clamped) under the read-head.
    #[must_use]
    pub fn offset_from_value(&self, value: f64) -> f64 {
        self.unit()
            .to_pixels(clamp_value(value, self.config.length()))
    }

    /// Paints the visible window and the read-head.
    ///
    /// The strip is clipped to the view; the read-head is drawn on top,
    /// centred horizontally.
    pub fn paint<B>(&mut self, backend: &mut B)
    where
        B: ImagingBackend + ?Sized,
    {
        let view_width = self.viewport.view_width();
        let origin = Affine::translate(Vec2::new(view_width / 2.0 - self.offset(), 0.0));
        let surface = &mut self.surface;
        backend.with_clip_rect(rect_f(0.0, 0.0, view_width, SCROLL_VIEW_HEIGHT), |b| {
            surface.paint(b, origin);
        });

        let paint = match self.indicator_paint {
            Some(paint) => paint,
            None => {
                let paint = backend.create_paint(PaintDesc {
                    brush: Brush::Solid(Color::BLACK),
                });
                self.indicator_paint = Some(paint);
                paint
            }
        };
        let left = view_width / 2.0 - INDICATOR_WIDTH / 2.0;
        let r = rect_f(
            left,
            INDICATOR_TOP,
            left + INDICATOR_WIDTH,
            INDICATOR_TOP + INDICATOR_HEIGHT,
        );
        #[expect(
            clippy::cast_possible_truncation,
            reason = "indicator radius is a small constant"
        )]
        let radius = INDICATOR_CORNER_RADIUS as f32;
        backend.state(StateOp::SetTransform(Affine::IDENTITY));
        backend.state(StateOp::SetPaint(paint));
        backend.draw(DrawOp::FillRoundedRect(RoundedRectF { rect: r, radius }));
    }

    /// Destroys every backend resource created by [`paint`](Self::paint).
    pub fn release<B>(&mut self, backend: &mut B)
    where
        B: ResourceBackend + ?Sized,
    {
        self.surface.release(backend);
        if let Some(paint) = self.indicator_paint.take() {
            backend.destroy_paint(paint);
        }
    }

    /// Snapshot of the control state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> RulerDebugInfo {
        RulerDebugInfo {
            unit: self.unit(),
            length: self.config.length(),
            step: self.config.step(),
            value: self.value,
            offset: self.offset(),
            view_width: self.viewport.view_width(),
            content_width: self.viewport.content_width(),
            phase: self.viewport.phase(),
            subscribers: self.subscribers.len(),
            tint: self.tint(),
        }
    }

    fn layout(&mut self, view_width: f64) {
        let view_width = if view_width.is_finite() {
            view_width.max(0.0)
        } else {
            0.0
        };
        self.viewport
            .set_widths(view_width, view_width + self.surface.width());
        let offset = self.offset_from_value(self.value);
        if self.viewport.phase() == ScrollPhase::Idle {
            self.viewport.scroll_to(offset, false);
        }
        self.process_events();
    }

    fn process_events(&mut self) {
        loop {
            let events: SmallVec<[ScrollEvent; 4]> = self.viewport.drain_events().collect();
            if events.is_empty() {
                break;
            }
            for event in events {
                match event {
                    ScrollEvent::ScrollChanged { offset, source } if source.is_user_driven() => {
                        self.sample(offset);
                    }
                    ScrollEvent::ScrollChanged { .. } => {}
                    ScrollEvent::DragEnded {
                        will_decelerate: true,
                    } => {}
                    ScrollEvent::DragEnded {
                        will_decelerate: false,
                    }
                    | ScrollEvent::DecelerationEnded
                    | ScrollEvent::ScrollAnimationEnded => self.settle(),
                }
            }
        }
    }

    /// Live update on the coarse grid while the content moves.
    fn sample(&mut self, offset: f64) {
        let raw = self.unit().from_pixels(offset);
        let value = quantize(raw, COARSE_GRID, self.config.length());
        self.store(value);
    }

    /// Snap to the step and glide the read-head onto it.
    fn settle(&mut self) {
        let raw = self.unit().from_pixels(self.offset());
        let value = quantize(raw, self.config.step(), self.config.length());
        tracing::debug!(raw, value, "ruler settled");
        self.store(value);
        self.viewport
            .scroll_to(self.offset_from_value(self.value), true);
    }

    fn store(&mut self, value: f64) {
        if value == self.value {
            return;
        }
        self.value = value;
        tracing::debug!(value, "value changed");
        for (_, handler) in &mut self.subscribers {
            handler(value);
        }
    }
}

/// Debug snapshot of a [`RulerControl`].
#[derive(Clone, Debug, PartialEq)]
pub struct RulerDebugInfo {
    /// Unit of measure.
    pub unit: Unit,
    /// Ruler length in units.
    pub length: f64,
    /// Settle grid.
    pub step: f64,
    /// Current value.
    pub value: f64,
    /// Content offset.
    pub offset: f64,
    /// View width.
    pub view_width: f64,
    /// Content width.
    pub content_width: f64,
    /// Scroll phase.
    pub phase: ScrollPhase,
    /// Number of registered handlers.
    pub subscribers: usize,
    /// Strip color.
    pub tint: Color,
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "view geometry is well within f32 range"
)]
fn rect_f(x0: f64, y0: f64, x1: f64, y1: f64) -> RectF {
    RectF::new(x0 as f32, y0 as f32, x1 as f32, y1 as f32)
}

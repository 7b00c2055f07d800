// Copyright 2025 the Tapeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `abs` and `powi`
use smallvec::SmallVec;

use crate::drag::DragState;
use crate::{ScrollConfig, ScrollEvent, ScrollPhase, ScrollSource};

/// Offsets closer than this are treated as equal.
const OFFSET_EPSILON: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
struct OffsetAnimation {
    from: f64,
    to: f64,
    elapsed: f64,
}

/// Horizontal scroll viewport over a content strip.
///
/// `ScrollViewport` models the scroll container of a single-axis scroller: a
/// view of fixed width looking at wider content through a content offset.
/// Offset `0` shows the content's leading edge at the view's leading edge;
/// the offset is always kept inside `[0, content_width - view_width]`.
///
/// Input arrives as drag samples ([`begin_drag`](Self::begin_drag),
/// [`drag_to`](Self::drag_to), [`end_drag`](Self::end_drag)) and clock ticks
/// ([`tick`](Self::tick)); programmatic moves go through
/// [`scroll_to`](Self::scroll_to). Every observable change is queued as a
/// [`ScrollEvent`] in the order it happened and handed out by
/// [`drain_events`](Self::drain_events).
#[derive(Clone, Debug)]
pub struct ScrollViewport {
    view_width: f64,
    content_width: f64,
    offset: f64,
    phase: ScrollPhase,
    velocity: f64,
    drag: DragState,
    animation: Option<OffsetAnimation>,
    config: ScrollConfig,
    events: SmallVec<[ScrollEvent; 4]>,
}

impl ScrollViewport {
    /// Creates an idle viewport at offset zero.
    ///
    /// Negative or non-finite widths are treated as zero.
    #[must_use]
    pub fn new(view_width: f64, content_width: f64, config: ScrollConfig) -> Self {
        Self {
            view_width: sanitize_width(view_width),
            content_width: sanitize_width(content_width),
            offset: 0.0,
            phase: ScrollPhase::Idle,
            velocity: 0.0,
            drag: DragState::default(),
            animation: None,
            config,
            events: SmallVec::new(),
        }
    }

    /// Current content offset in pixels.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Current interaction phase.
    #[must_use]
    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    /// Current momentum velocity of the content in px/s.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Width of the view in pixels.
    #[must_use]
    pub fn view_width(&self) -> f64 {
        self.view_width
    }

    /// Width of the scrollable content in pixels.
    #[must_use]
    pub fn content_width(&self) -> f64 {
        self.content_width
    }

    /// Returns the scroll configuration.
    #[must_use]
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Largest reachable offset.
    #[must_use]
    pub fn max_offset(&self) -> f64 {
        (self.content_width - self.view_width).max(0.0)
    }

    /// Resizes the view and the content together, re-clamping the offset once.
    ///
    /// The offset is only moved when it no longer fits the new range, so
    /// growing both widths keeps the content where it was. A running animation
    /// keeps going towards its re-clamped target.
    pub fn set_widths(&mut self, view_width: f64, content_width: f64) {
        let view_width = sanitize_width(view_width);
        let content_width = sanitize_width(content_width);
        if (self.view_width - view_width).abs() < OFFSET_EPSILON
            && (self.content_width - content_width).abs() < OFFSET_EPSILON
        {
            return;
        }
        self.view_width = view_width;
        self.content_width = content_width;
        self.reclamp();
    }

    /// Begins a drag at pointer `x` (view space) and `time_ms`.
    ///
    /// A drag interrupts any running animation or deceleration. Interrupted
    /// motion does not report an end event; the new gesture supersedes it.
    pub fn begin_drag(&mut self, x: f64, time_ms: f64) {
        if self.phase != ScrollPhase::Idle && self.phase != ScrollPhase::Dragging {
            tracing::trace!(phase = ?self.phase, "drag interrupts scroll motion");
        }
        self.animation = None;
        self.velocity = 0.0;
        self.drag.start(x, time_ms);
        self.set_phase(ScrollPhase::Dragging);
    }

    /// Moves the pointer of the active drag to `x`.
    ///
    /// Moving the pointer left scrolls the content forward (the offset grows).
    /// Ignored when no drag is active.
    pub fn drag_to(&mut self, x: f64, time_ms: f64) {
        if self.phase != ScrollPhase::Dragging {
            return;
        }
        if let Some(delta) = self.drag.update(x, time_ms) {
            self.move_to(self.offset - delta, ScrollSource::Drag);
        }
    }

    /// Lifts the pointer of the active drag at `time_ms`.
    ///
    /// Queues [`ScrollEvent::DragEnded`]; with enough release velocity the
    /// viewport starts decelerating and later queues
    /// [`ScrollEvent::DecelerationEnded`].
    pub fn end_drag(&mut self, time_ms: f64) {
        if self.phase != ScrollPhase::Dragging {
            return;
        }
        let pointer_velocity = self.drag.release_velocity(time_ms, self.config.rest_ms);
        self.drag.end();

        let max = self.config.max_fling_velocity;
        let velocity = (-pointer_velocity).clamp(-max, max);
        let at_edge = (velocity < 0.0 && self.offset <= 0.0)
            || (velocity > 0.0 && self.offset >= self.max_offset());
        let will_decelerate = velocity.abs() > self.config.velocity_threshold && !at_edge;

        self.events.push(ScrollEvent::DragEnded { will_decelerate });
        if will_decelerate {
            self.velocity = velocity;
            self.set_phase(ScrollPhase::Decelerating);
        } else {
            self.velocity = 0.0;
            self.set_phase(ScrollPhase::Idle);
        }
    }

    /// Moves the content to `offset`, optionally animated.
    ///
    /// The target is clamped to the reachable range. A move to the current
    /// offset is a no-op and queues nothing. Otherwise a non-animated move
    /// queues a single [`ScrollEvent::ScrollChanged`]; an animated move queues
    /// changes on subsequent ticks followed by
    /// [`ScrollEvent::ScrollAnimationEnded`]. While a drag is active the move
    /// is applied immediately.
    pub fn scroll_to(&mut self, offset: f64, animated: bool) {
        let target = self.clamp_offset(offset);
        if self.phase == ScrollPhase::Dragging {
            self.move_to(target, ScrollSource::Programmatic);
            return;
        }

        self.velocity = 0.0;
        self.animation = None;
        if (target - self.offset).abs() < OFFSET_EPSILON {
            self.set_phase(ScrollPhase::Idle);
            return;
        }

        if animated && self.config.animation_duration > 0.0 {
            self.animation = Some(OffsetAnimation {
                from: self.offset,
                to: target,
                elapsed: 0.0,
            });
            self.set_phase(ScrollPhase::Animating);
        } else {
            self.set_phase(ScrollPhase::Idle);
            self.move_to(target, ScrollSource::Programmatic);
        }
    }

    /// Advances momentum and animations by `dt` seconds.
    ///
    /// Returns `true` while the viewport is still moving on its own.
    pub fn tick(&mut self, dt: f64) -> bool {
        if dt.is_nan() || dt <= 0.0 {
            return self.is_animating();
        }
        match self.phase {
            ScrollPhase::Idle | ScrollPhase::Dragging => false,
            ScrollPhase::Decelerating => self.tick_deceleration(dt),
            ScrollPhase::Animating => self.tick_animation(dt),
        }
    }

    /// Returns `true` while decelerating or animating.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        matches!(
            self.phase,
            ScrollPhase::Decelerating | ScrollPhase::Animating
        )
    }

    /// Hands out the queued events in the order they occurred.
    pub fn drain_events(&mut self) -> impl Iterator<Item = ScrollEvent> + '_ {
        self.events.drain(..)
    }

    /// Returns `true` if events are waiting to be drained.
    #[must_use]
    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Snapshot of the current viewport state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ScrollViewportDebugInfo {
        ScrollViewportDebugInfo {
            view_width: self.view_width,
            content_width: self.content_width,
            offset: self.offset,
            max_offset: self.max_offset(),
            phase: self.phase,
            velocity: self.velocity,
            animation_target: self.animation.map(|a| a.to),
            pending_events: self.events.len(),
        }
    }

    fn tick_deceleration(&mut self, dt: f64) -> bool {
        let next = self.offset + self.velocity * dt;

        // Linear friction towards zero.
        let decel = self.config.deceleration * dt;
        if self.velocity > 0.0 {
            self.velocity = (self.velocity - decel).max(0.0);
        } else {
            self.velocity = (self.velocity + decel).min(0.0);
        }

        let clamped = self.clamp_offset(next);
        let hit_edge = clamped != next;
        self.move_to(clamped, ScrollSource::Momentum);

        if hit_edge || self.velocity.abs() < self.config.velocity_threshold {
            self.velocity = 0.0;
            self.set_phase(ScrollPhase::Idle);
            self.events.push(ScrollEvent::DecelerationEnded);
            return false;
        }
        true
    }

    fn tick_animation(&mut self, dt: f64) -> bool {
        let Some(mut anim) = self.animation else {
            self.set_phase(ScrollPhase::Idle);
            return false;
        };
        anim.elapsed += dt;
        let t = (anim.elapsed / self.config.animation_duration).min(1.0);
        let done = t >= 1.0;
        let offset = if done {
            anim.to
        } else {
            anim.from + (anim.to - anim.from) * ease_in_out_cubic(t)
        };
        self.move_to(offset, ScrollSource::Animation);

        if done {
            self.animation = None;
            self.set_phase(ScrollPhase::Idle);
            self.events.push(ScrollEvent::ScrollAnimationEnded);
            false
        } else {
            self.animation = Some(anim);
            true
        }
    }

    fn move_to(&mut self, offset: f64, source: ScrollSource) {
        let offset = self.clamp_offset(offset);
        if offset == self.offset {
            return;
        }
        tracing::trace!(from = self.offset, to = offset, ?source, "scroll offset changed");
        self.offset = offset;
        self.events.push(ScrollEvent::ScrollChanged { offset, source });
    }

    fn reclamp(&mut self) {
        let max = self.max_offset();
        if let Some(anim) = self.animation.as_mut() {
            anim.to = anim.to.clamp(0.0, max);
        }
        self.move_to(self.offset, ScrollSource::Programmatic);
    }

    fn clamp_offset(&self, offset: f64) -> f64 {
        if offset.is_nan() {
            return 0.0;
        }
        offset.clamp(0.0, self.max_offset())
    }

    fn set_phase(&mut self, phase: ScrollPhase) {
        if self.phase != phase {
            tracing::trace!(from = ?self.phase, to = ?phase, "scroll phase");
            self.phase = phase;
        }
    }
}

/// Debug snapshot of a [`ScrollViewport`] state.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollViewportDebugInfo {
    /// View width in pixels.
    pub view_width: f64,
    /// Content width in pixels.
    pub content_width: f64,
    /// Current content offset.
    pub offset: f64,
    /// Largest reachable offset.
    pub max_offset: f64,
    /// Interaction phase.
    pub phase: ScrollPhase,
    /// Momentum velocity in px/s.
    pub velocity: f64,
    /// Target offset of a running animation.
    pub animation_target: Option<f64>,
    /// Number of queued, undrained events.
    pub pending_events: usize,
}

fn sanitize_width(width: f64) -> f64 {
    if width.is_finite() { width.max(0.0) } else { 0.0 }
}

fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::vec::Vec;

    use super::*;

    fn viewport() -> ScrollViewport {
        // 400 px view over 400 + 2000 px of content.
        ScrollViewport::new(400.0, 2400.0, ScrollConfig::default())
    }

    fn events(vp: &mut ScrollViewport) -> Vec<ScrollEvent> {
        vp.drain_events().collect()
    }

    #[test]
    fn dragging_left_scrolls_forward() {
        let mut vp = viewport();
        vp.begin_drag(300.0, 0.0);
        vp.drag_to(250.0, 16.0);
        assert_eq!(vp.offset(), 50.0);
        assert_eq!(
            events(&mut vp),
            [ScrollEvent::ScrollChanged {
                offset: 50.0,
                source: ScrollSource::Drag
            }]
        );
    }

    #[test]
    fn offset_is_clamped_to_content() {
        let mut vp = viewport();
        vp.begin_drag(0.0, 0.0);
        vp.drag_to(500.0, 16.0);
        assert_eq!(vp.offset(), 0.0);
        assert!(events(&mut vp).is_empty(), "no change at the leading edge");
        vp.drag_to(-5000.0, 32.0);
        assert_eq!(vp.offset(), 2000.0);
    }

    #[test]
    fn slow_release_ends_without_deceleration() {
        let mut vp = viewport();
        vp.begin_drag(300.0, 0.0);
        vp.drag_to(299.0, 200.0);
        vp.end_drag(400.0);
        let evs = events(&mut vp);
        assert_eq!(
            evs.last(),
            Some(&ScrollEvent::DragEnded {
                will_decelerate: false
            })
        );
        assert_eq!(vp.phase(), ScrollPhase::Idle);
        assert!(!vp.tick(0.016));
    }

    #[test]
    fn fling_decelerates_then_reports_end() {
        let mut vp = viewport();
        vp.begin_drag(300.0, 0.0);
        vp.drag_to(280.0, 16.0);
        vp.drag_to(250.0, 32.0);
        vp.end_drag(40.0);
        assert_eq!(vp.phase(), ScrollPhase::Decelerating);
        assert!(vp.velocity() > 0.0);
        let evs = events(&mut vp);
        assert_eq!(
            evs.last(),
            Some(&ScrollEvent::DragEnded {
                will_decelerate: true
            })
        );

        let start = vp.offset();
        let mut frames = 0;
        while vp.tick(1.0 / 60.0) {
            frames += 1;
            assert!(frames < 10_000, "deceleration must terminate");
        }
        assert!(vp.offset() > start);
        let evs = events(&mut vp);
        assert!(
            evs.iter()
                .take(evs.len() - 1)
                .all(|e| matches!(e, ScrollEvent::ScrollChanged { source: ScrollSource::Momentum, .. }))
        );
        assert_eq!(evs.last(), Some(&ScrollEvent::DecelerationEnded));
    }

    #[test]
    fn animated_scroll_reaches_target_and_reports_end() {
        let mut vp = viewport();
        vp.scroll_to(534.0, true);
        assert_eq!(vp.phase(), ScrollPhase::Animating);
        while vp.tick(1.0 / 60.0) {}
        assert_eq!(vp.offset(), 534.0);
        let evs = events(&mut vp);
        assert_eq!(evs.last(), Some(&ScrollEvent::ScrollAnimationEnded));
        assert_eq!(
            evs[evs.len() - 2],
            ScrollEvent::ScrollChanged {
                offset: 534.0,
                source: ScrollSource::Animation
            }
        );
    }

    #[test]
    fn scroll_to_current_offset_is_silent() {
        let mut vp = viewport();
        vp.scroll_to(0.0, true);
        assert_eq!(vp.phase(), ScrollPhase::Idle);
        assert!(!vp.has_pending_events());
    }

    #[test]
    fn immediate_scroll_reports_programmatic_change() {
        let mut vp = viewport();
        vp.scroll_to(9999.0, false);
        assert_eq!(vp.offset(), 2000.0);
        assert_eq!(
            events(&mut vp),
            [ScrollEvent::ScrollChanged {
                offset: 2000.0,
                source: ScrollSource::Programmatic
            }]
        );
    }

    #[test]
    fn drag_interrupts_animation_without_end_event() {
        let mut vp = viewport();
        vp.scroll_to(1000.0, true);
        vp.tick(0.05);
        vp.begin_drag(200.0, 100.0);
        assert_eq!(vp.phase(), ScrollPhase::Dragging);
        assert!(!vp.tick(0.5));
        let evs = events(&mut vp);
        assert!(!evs.contains(&ScrollEvent::ScrollAnimationEnded));
    }

    #[test]
    fn shrinking_content_reclamps_offset() {
        let mut vp = viewport();
        vp.scroll_to(1500.0, false);
        vp.drain_events().for_each(drop);
        vp.set_widths(400.0, 1000.0);
        assert_eq!(vp.offset(), 600.0);
        assert_eq!(vp.debug_info().max_offset, 600.0);
        assert_eq!(
            events(&mut vp),
            [ScrollEvent::ScrollChanged {
                offset: 600.0,
                source: ScrollSource::Programmatic
            }]
        );
    }

    #[test]
    fn growing_view_and_content_keeps_offset() {
        let mut vp = viewport();
        vp.scroll_to(1200.0, false);
        vp.drain_events().for_each(drop);
        // The new view alone would not fit the old content at this offset.
        vp.set_widths(2500.0, 4500.0);
        assert_eq!(vp.offset(), 1200.0);
        assert_eq!(vp.max_offset(), 2000.0);
        assert!(!vp.has_pending_events());
    }

    #[test]
    fn resize_keeps_momentum_running() {
        let mut vp = viewport();
        vp.begin_drag(300.0, 0.0);
        vp.drag_to(200.0, 16.0);
        vp.end_drag(20.0);
        assert_eq!(vp.phase(), ScrollPhase::Decelerating);
        let before = vp.offset();
        vp.drain_events().for_each(drop);
        vp.set_widths(800.0, 2800.0);
        assert_eq!(vp.offset(), before);
        assert_eq!(vp.phase(), ScrollPhase::Decelerating);
        assert!(vp.tick(1.0 / 60.0));
        assert!(vp.offset() > before);
    }

    #[test]
    fn resize_retargets_running_animation() {
        let mut vp = viewport();
        vp.scroll_to(1800.0, true);
        vp.set_widths(400.0, 1400.0);
        assert_eq!(vp.debug_info().animation_target, Some(1000.0));
        while vp.tick(1.0 / 60.0) {}
        assert_eq!(vp.offset(), 1000.0);
    }

    #[test]
    fn easing_is_monotonic_and_bounded() {
        let mut prev = 0.0;
        for i in 0..=100 {
            let v = ease_in_out_cubic(f64::from(i) / 100.0);
            assert!(v >= prev - 1e-12);
            prev = v;
        }
        assert!((prev - 1.0).abs() < 1e-12);
    }
}

// Copyright 2025 the Tapeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The view controller hosting a ruler picker.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use peniko::Color;
use tapeline_imaging_svg::{SvgBackend, SvgText};
use tapeline_ruler::control::SCROLL_VIEW_HEIGHT;
use tapeline_ruler::surface::LABEL_HEIGHT;
use tapeline_ruler::{RulerConfig, RulerControl};

/// Font size of the numerals under the ruler.
const LABEL_FONT_SIZE: f32 = 14.0;
/// Font size of the readout under the ruler.
const READOUT_FONT_SIZE: f32 = 24.0;
/// Readout baseline, below the ruler strip.
const READOUT_BASELINE: f64 = 92.0;

type ValueChanged = Box<dyn FnMut(f64, &str)>;

/// Owns a [`RulerControl`] and mirrors its value into a text readout.
pub(crate) struct RulerHost {
    ruler: RulerControl,
    readout: Rc<RefCell<String>>,
}

impl std::fmt::Debug for RulerHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RulerHost")
            .field("ruler", &self.ruler)
            .field("readout", &self.readout.borrow())
            .finish()
    }
}

impl RulerHost {
    /// Builds the ruler, lays it out at `view_width`, and wires the readout.
    ///
    /// `value_changed` is forwarded every change with the value and its
    /// formatted text.
    pub(crate) fn new(
        config: RulerConfig,
        view_width: f64,
        value_changed: Option<ValueChanged>,
    ) -> Result<Self> {
        let mut ruler = RulerControl::new(config).context("invalid ruler configuration")?;
        ruler.set_view_width(view_width);

        let readout = Rc::new(RefCell::new(format_value(ruler.value())));
        let sink = Rc::clone(&readout);
        let mut forward = value_changed;
        ruler.subscribe(move |value| {
            let text = format_value(value);
            tracing::info!(value = %text, "value changed");
            if let Some(callback) = forward.as_mut() {
                callback(value, &text);
            }
            *sink.borrow_mut() = text;
        });

        Ok(Self { ruler, readout })
    }

    pub(crate) fn ruler(&self) -> &RulerControl {
        &self.ruler
    }

    /// Text currently shown in the readout.
    pub(crate) fn readout(&self) -> String {
        self.readout.borrow().clone()
    }

    /// Sets the value programmatically and refreshes the readout.
    ///
    /// The ruler reports no change for programmatic sets, so the host
    /// formats the value itself.
    pub(crate) fn set_value(&mut self, value: f64, animated: bool) {
        self.ruler.set_value(value, animated);
        *self.readout.borrow_mut() = format_value(self.ruler.value());
    }

    pub(crate) fn set_tint(&mut self, color: Color) {
        self.ruler.set_tint(color);
    }

    /// Drags the tape left by `pixels` (right when negative).
    ///
    /// A fling lifts immediately after a fast move so momentum carries on;
    /// otherwise the pointer rests before lifting.
    pub(crate) fn drag(&mut self, pixels: f64, fling: bool) {
        const SAMPLES: u32 = 8;
        let start = self.ruler.view_width() / 2.0;
        let (frame_ms, rest_ms) = if fling { (8.0, 4.0) } else { (120.0, 400.0) };

        self.ruler.begin_drag(start, 0.0);
        let mut t = 0.0;
        for i in 1..=SAMPLES {
            t += frame_ms;
            let x = start - pixels * f64::from(i) / f64::from(SAMPLES);
            self.ruler.drag_to(x, t);
        }
        self.ruler.end_drag(t + rest_ms);
    }

    /// Ticks at 60 Hz until the ruler comes to rest. Returns the frame count.
    pub(crate) fn run_until_idle(&mut self, max_frames: u32) -> u32 {
        let mut frames = 0;
        while frames < max_frames && self.ruler.tick(1.0 / 60.0) {
            frames += 1;
        }
        if self.ruler.is_animating() {
            tracing::warn!(frames, "ruler still moving after frame budget");
        }
        frames
    }

    /// Renders the visible ruler, its numerals, and the readout as SVG.
    ///
    /// Resources are created in a throwaway backend and released afterwards.
    pub(crate) fn render_svg(&mut self) -> String {
        let mut backend = SvgBackend::default();
        self.ruler.paint(&mut backend);

        let view_width = self.ruler.view_width();
        let shift = view_width / 2.0 - self.ruler.offset();
        let visible = 0.0..=view_width;
        for label in self.ruler.surface().labels() {
            let x = label.center_x + shift;
            if !visible.contains(&(label.frame.x0 + shift))
                && !visible.contains(&(label.frame.x1 + shift))
            {
                continue;
            }
            backend.push_text(SvgText {
                content: label.text,
                x,
                y: label.frame.y1 - LABEL_HEIGHT / 4.0,
                font_size: LABEL_FONT_SIZE,
                color: label.color,
            });
        }
        backend.push_text(SvgText {
            content: self.readout(),
            x: view_width / 2.0,
            y: READOUT_BASELINE,
            font_size: READOUT_FONT_SIZE,
            color: self.ruler.tint(),
        });

        #[expect(
            clippy::cast_possible_truncation,
            reason = "view sizes are small positive pixel counts"
        )]
        let (w, h) = (view_width.ceil() as u32, SCROLL_VIEW_HEIGHT as u32);
        let svg = backend.to_svg(w, h);
        // Each snapshot gets a fresh backend.
        self.ruler.release(&mut backend);
        svg
    }
}

/// One decimal place, as shown in the readout.
pub(crate) fn format_value(value: f64) -> String {
    format!("{value:.1}")
}

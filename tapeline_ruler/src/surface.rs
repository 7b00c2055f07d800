// Copyright 2025 the Tapeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ruler strip: tiled tick cells over a band of numerals.
//!
//! A [`RulerSurface`] is `unit_width × length` pixels wide and
//! [`RULER_HEIGHT`] tall. The top [`TICK_BAND_HEIGHT`] pixels hold the ticks;
//! the bottom [`LABEL_HEIGHT`] pixels hold one numeral per whole unit, centred
//! on its boundary tick.
//!
//! Ticks are painted through the imaging IR. Numerals are not: hosts place
//! them with their own text renderer using [`RulerSurface::labels`].

use alloc::string::String;
use core::ops::RangeInclusive;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `ceil`
use kurbo::{Rect, Vec2};
use peniko::{Brush, Color};
use tapeline_imaging::{
    Affine, ImagingBackend, PaintDesc, PaintId, ResourceBackend, draw_picture_repeated,
};
use tapeline_length::Unit;

use crate::tick_cell::{TickCell, TickCellPicture};

/// Overall height of the ruler strip.
pub const RULER_HEIGHT: f64 = 69.0;
/// Height of a numeral box.
pub const LABEL_HEIGHT: f64 = 20.0;
/// Width of a numeral box.
pub const LABEL_WIDTH: f64 = 100.0;
/// Gap between the tick band and the numerals.
pub const LABEL_MARGIN_TOP: f64 = 5.0;
/// Height of the band the ticks hang in.
pub const TICK_BAND_HEIGHT: f64 = RULER_HEIGHT - LABEL_HEIGHT - LABEL_MARGIN_TOP;

#[derive(Clone, Copy, Debug)]
struct SurfaceResources {
    paint: PaintId,
    cell: TickCellPicture,
}

/// Tick-and-numeral strip for one unit and length.
///
/// Backend resources (the tick paint, path and picture) are created on the
/// first [`paint`](Self::paint) and reused afterwards, so a surface is bound
/// to the backend it first painted into until [`release`](Self::release).
#[derive(Clone, Debug)]
pub struct RulerSurface {
    cell: TickCell,
    length: f64,
    tint: Color,
    tint_dirty: bool,
    resources: Option<SurfaceResources>,
}

impl RulerSurface {
    /// A surface `length` units long, stroked `line_width` wide, tinted black.
    #[must_use]
    pub fn new(unit: Unit, length: f64, line_width: f64) -> Self {
        Self {
            cell: TickCell::new(unit, line_width, TICK_BAND_HEIGHT),
            length,
            tint: Color::BLACK,
            tint_dirty: false,
            resources: None,
        }
    }

    /// Unit of measure.
    #[must_use]
    pub fn unit(&self) -> Unit {
        self.cell.unit()
    }

    /// Length in units.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The tick cell replicated across the strip.
    #[must_use]
    pub fn cell(&self) -> &TickCell {
        &self.cell
    }

    /// Pixel width of one unit.
    #[must_use]
    pub fn unit_width(&self) -> f64 {
        self.cell.unit_width()
    }

    /// Pixel width of the strip.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.unit_width() * self.length
    }

    /// Pixel height of the strip.
    #[must_use]
    pub fn height(&self) -> f64 {
        RULER_HEIGHT
    }

    /// Number of tick cells drawn: one per started unit.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "ruler lengths are far below u32::MAX units"
    )]
    pub fn cell_count(&self) -> u32 {
        self.length.ceil().max(0.0) as u32
    }

    /// Color of the ticks and numerals.
    #[must_use]
    pub fn tint(&self) -> Color {
        self.tint
    }

    /// Recolors ticks and numerals.
    ///
    /// Geometry is kept; the next [`paint`](Self::paint) updates the paint
    /// resource in place.
    pub fn set_tint(&mut self, color: Color) {
        if self.tint != color {
            self.tint = color;
            self.tint_dirty = self.resources.is_some();
        }
    }

    /// Numeral placements, `0` through `ceil(length)`.
    #[must_use]
    pub fn labels(&self) -> Labels {
        Labels {
            indices: 0..=self.cell_count(),
            unit_width: self.unit_width(),
            color: self.tint,
        }
    }

    /// Paints the ticks with the strip's leading edge at `origin`.
    ///
    /// Emits one [`DrawPicture`](tapeline_imaging::DrawOp::DrawPicture) per
    /// cell, each translated by one unit width. The first cell is shifted left
    /// by half a line width so the zero tick is centred on the leading edge.
    pub fn paint<B>(&mut self, backend: &mut B, origin: Affine)
    where
        B: ImagingBackend + ?Sized,
    {
        let resources = self.ensure_resources(backend);
        let first = origin * Affine::translate((-self.cell.line_width() / 2.0, 0.0));
        draw_picture_repeated(
            backend,
            resources.cell.picture,
            first,
            self.cell_count(),
            Vec2::new(self.unit_width(), 0.0),
        );
    }

    /// Destroys the backend resources created by [`paint`](Self::paint).
    pub fn release<B>(&mut self, backend: &mut B)
    where
        B: ResourceBackend + ?Sized,
    {
        if let Some(res) = self.resources.take() {
            backend.destroy_picture(res.cell.picture);
            backend.destroy_path(res.cell.path);
            backend.destroy_paint(res.paint);
            self.tint_dirty = false;
        }
    }

    fn ensure_resources<B>(&mut self, backend: &mut B) -> SurfaceResources
    where
        B: ImagingBackend + ?Sized,
    {
        match self.resources {
            Some(res) => {
                if self.tint_dirty {
                    backend.update_paint(res.paint, solid(self.tint));
                    self.tint_dirty = false;
                }
                res
            }
            None => {
                let paint = backend.create_paint(solid(self.tint));
                let cell = self.cell.record(backend, paint);
                let res = SurfaceResources { paint, cell };
                self.resources = Some(res);
                self.tint_dirty = false;
                res
            }
        }
    }
}

fn solid(color: Color) -> PaintDesc {
    PaintDesc {
        brush: Brush::Solid(color),
    }
}

/// A numeral placed under a boundary tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    /// Whole-unit index; also the numeral's value.
    pub index: u32,
    /// Text to draw.
    pub text: String,
    /// Horizontal centre in surface coordinates.
    pub center_x: f64,
    /// Box the text is centred in.
    pub frame: Rect,
    /// Text color.
    pub color: Color,
}

/// Iterator over a surface's [`Label`]s.
#[derive(Clone, Debug)]
pub struct Labels {
    indices: RangeInclusive<u32>,
    unit_width: f64,
    color: Color,
}

impl Labels {
    fn label(&self, index: u32) -> Label {
        let center_x = f64::from(index) * self.unit_width;
        let top = RULER_HEIGHT - LABEL_HEIGHT;
        Label {
            index,
            text: alloc::format!("{index}"),
            center_x,
            frame: Rect::new(
                center_x - LABEL_WIDTH / 2.0,
                top,
                center_x + LABEL_WIDTH / 2.0,
                RULER_HEIGHT,
            ),
            color: self.color,
        }
    }
}

impl Iterator for Labels {
    type Item = Label;

    fn next(&mut self) -> Option<Label> {
        let index = self.indices.next()?;
        Some(self.label(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl ExactSizeIterator for Labels {}

// Copyright 2025 the Tapeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graduation marks for one unit of a ruler.
//!
//! A [`TickCell`] describes the eleven ticks spanning a single unit: the
//! boundary tick at each end, a taller "half" tick, and short minor ticks in
//! between. Ticks hang from the top edge (`y = 0`) of the tick band.
//!
//! The cell is recorded once as a picture and replayed once per unit by the
//! surface, so geometry cost does not depend on the ruler's length.

use alloc::vec::Vec;

use kurbo::{Cap, Stroke};
use tapeline_imaging::{
    DrawOp, ImagingBackend, PaintId, PathCmd, PathDesc, PathId, PictureId, StateOp,
    record_picture,
};
use tapeline_length::Unit;

/// Number of ticks in a cell, both boundary ticks included.
pub const TICKS_PER_CELL: u32 = Unit::DIVISIONS + 1;

/// Height of a boundary tick relative to the tick band.
pub const MAJOR_TICK_RATIO: f64 = 1.0;
/// Height of a half tick relative to the tick band.
pub const HALF_TICK_RATIO: f64 = 0.7;
/// Height of a minor tick relative to the tick band.
pub const MINOR_TICK_RATIO: f64 = 0.5;

/// A single graduation mark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    /// Position within the cell, `0..=10`.
    pub index: u32,
    /// Horizontal center of the stroke in cell coordinates.
    pub x: f64,
    /// Length of the mark measured down from the top edge.
    pub height: f64,
}

/// Generator for the ticks of one unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickCell {
    unit: Unit,
    line_width: f64,
    height: f64,
}

impl TickCell {
    /// A cell for `unit`, stroked `line_width` wide, in a band `height` tall.
    #[must_use]
    pub fn new(unit: Unit, line_width: f64, height: f64) -> Self {
        Self {
            unit,
            line_width,
            height,
        }
    }

    /// Unit of measure.
    #[must_use]
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Stroke width in pixels.
    #[must_use]
    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Height of the tick band.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Pixel distance between two boundary ticks.
    #[must_use]
    pub fn unit_width(&self) -> f64 {
        self.unit.pixels_per_unit()
    }

    /// Width of the cell including the overhang of the outer strokes.
    #[must_use]
    pub fn cell_width(&self) -> f64 {
        self.unit_width() + self.line_width
    }

    /// Height of tick `index` as a fraction of the band.
    #[must_use]
    pub fn height_ratio(&self, index: u32) -> f64 {
        if index % Unit::DIVISIONS == 0 {
            MAJOR_TICK_RATIO
        } else if index % self.unit.half_tick_every() == 0 {
            HALF_TICK_RATIO
        } else {
            MINOR_TICK_RATIO
        }
    }

    /// Returns tick `index` of the cell.
    #[must_use]
    pub fn tick(&self, index: u32) -> Tick {
        let spacing = self.unit_width() / f64::from(Unit::DIVISIONS);
        Tick {
            index,
            x: self.line_width / 2.0 + f64::from(index) * spacing,
            height: self.height * self.height_ratio(index),
        }
    }

    /// All ticks of the cell, left to right.
    pub fn ticks(&self) -> impl Iterator<Item = Tick> + '_ {
        (0..TICKS_PER_CELL).map(|i| self.tick(i))
    }

    /// One path holding every tick as a separate segment.
    #[must_use]
    pub fn path(&self) -> PathDesc {
        let mut commands = Vec::with_capacity(2 * TICKS_PER_CELL as usize);
        for tick in self.ticks() {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "ruler geometry is well within f32 range"
            )]
            let (x, y) = (tick.x as f32, tick.height as f32);
            commands.push(PathCmd::MoveTo { x, y: 0.0 });
            commands.push(PathCmd::LineTo { x, y });
        }
        PathDesc {
            commands: commands.into_boxed_slice(),
        }
    }

    /// Stroke style shared by all ticks.
    #[must_use]
    pub fn stroke(&self) -> Stroke {
        Stroke::new(self.line_width).with_caps(Cap::Butt)
    }

    /// Records the cell into a new picture drawn with `paint`.
    ///
    /// Recording is repeatable: each call creates a fresh path and picture
    /// with identical content. Recoloring goes through the paint resource.
    pub fn record<B>(&self, backend: &mut B, paint: PaintId) -> TickCellPicture
    where
        B: ImagingBackend + ?Sized,
    {
        let path = backend.create_path(self.path());
        let stroke = self.stroke();
        let picture = record_picture(backend, |b| {
            b.state(StateOp::SetPaint(paint));
            b.state(StateOp::SetStroke(stroke));
            b.draw(DrawOp::StrokePath(path));
        });
        tracing::trace!(unit = ?self.unit, ?path, ?picture, "recorded tick cell");
        TickCellPicture { path, picture }
    }
}

/// Resources created by [`TickCell::record`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickCellPicture {
    /// The stroked tick path.
    pub path: PathId,
    /// Picture replaying the stroke.
    pub picture: PictureId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heights(cell: &TickCell) -> Vec<f64> {
        cell.ticks().map(|t| t.height).collect()
    }

    #[test]
    fn centimeter_pattern() {
        let cell = TickCell::new(Unit::Centimeter, 1.0, 44.0);
        let expected = [44.0, 22.0, 22.0, 22.0, 22.0, 30.8, 22.0, 22.0, 22.0, 22.0, 44.0];
        for (got, want) in heights(&cell).into_iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
    }

    #[test]
    fn inch_pattern() {
        let cell = TickCell::new(Unit::Inch, 1.0, 100.0);
        assert_eq!(
            heights(&cell),
            [100.0, 50.0, 70.0, 50.0, 70.0, 50.0, 70.0, 50.0, 70.0, 50.0, 100.0]
        );
    }

    #[test]
    fn positions_are_offset_by_half_the_line() {
        let cell = TickCell::new(Unit::Centimeter, 2.0, 44.0);
        let xs: Vec<f64> = cell.ticks().map(|t| t.x).collect();
        assert_eq!(xs.len(), 11);
        assert_eq!(xs[0], 1.0);
        assert_eq!(xs[1], 11.0);
        assert_eq!(xs[10], 101.0);
        assert_eq!(cell.cell_width(), 102.0);
    }

    #[test]
    fn path_is_one_segment_per_tick() {
        let cell = TickCell::new(Unit::Inch, 1.0, 44.0);
        let path = cell.path();
        assert_eq!(path.commands.len(), 22);
        assert_eq!(path.commands[0], PathCmd::MoveTo { x: 0.5, y: 0.0 });
        assert_eq!(path.commands[1], PathCmd::LineTo { x: 0.5, y: 44.0 });
        assert_eq!(path.commands[21], PathCmd::LineTo { x: 80.5, y: 44.0 });
    }

    #[test]
    fn stroke_uses_line_width() {
        let cell = TickCell::new(Unit::Centimeter, 1.5, 44.0);
        assert_eq!(cell.stroke().width, 1.5);
        assert_eq!(cell.stroke().start_cap, Cap::Butt);
    }
}

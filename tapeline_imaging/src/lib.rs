// Copyright 2025 the Tapeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tapeline Imaging: a small imaging IR with recorded pictures.
//!
//! This crate defines a plain‑old‑data (POD) friendly imaging intermediate
//! representation and the traits a rendering backend implements to consume
//! it. Widgets such as the Tapeline ruler describe what they draw as a stream
//! of [`ImagingOp`]s; backends (for example `tapeline_imaging_svg`) turn that
//! stream into pixels or documents.
//!
//! # Core concepts
//!
//! - **Resources**: small, opaque handles ([`PathId`], [`PaintId`],
//!   [`PictureId`]) whose lifetimes are managed via [`ResourceBackend`].
//! - **Imaging operations**: [`StateOp`] (mutate state) and [`DrawOp`]
//!   (produce pixels), combined into [`ImagingOp`] for recording.
//! - **Pictures**: [`record_picture`] captures a short op sequence once as a
//!   reusable resource. [`draw_picture_repeated`] then replays it many times
//!   with a fixed translation between instances, so geometry is generated
//!   once no matter how many copies are drawn.
//! - **Paint indirection**: recorded ops reference paints by [`PaintId`].
//!   [`ResourceBackend::update_paint`] swaps the brush behind an id, which
//!   recolors every recording that uses it without re-recording geometry.
//!
//! # Example
//!
//! ```ignore
//! # use tapeline_imaging::*;
//! # use kurbo::Vec2;
//! # use peniko::{Brush, Color};
//! # struct MyBackend { /* implements ResourceBackend + ImagingBackend */ }
//! let mut backend = MyBackend { /* ... */ };
//!
//! let paint = backend.create_paint(PaintDesc { brush: Brush::Solid(Color::BLACK) });
//! let tick = backend.create_path(PathDesc {
//!     commands: Box::new([PathCmd::MoveTo { x: 0.0, y: 0.0 }, PathCmd::LineTo { x: 0.0, y: 10.0 }]),
//! });
//! let cell = record_picture(&mut backend, |b| {
//!     b.state(StateOp::SetPaint(paint));
//!     b.draw(DrawOp::StrokePath(tick));
//! });
//!
//! // Ten copies, 100 px apart.
//! draw_picture_repeated(&mut backend, cell, Affine::IDENTITY, 10, Vec2::new(100.0, 0.0));
//! ```

#![no_std]

extern crate alloc;

use alloc::{boxed::Box, sync::Arc};
use kurbo::Vec2;
use peniko::Brush;

/// Identifier for a path resource.
///
/// Paths are expected to be reused across frames and inside recordings while
/// they remain alive.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathId(pub u32);

/// Identifier for a paint resource.
///
/// Paints may be shared by many paths and pictures. Updating a paint through
/// [`ResourceBackend::update_paint`] keeps the id stable.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PaintId(pub u32);

/// Identifier for a picture resource (nested imaging program).
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PictureId(pub u32);

/// Affine transform type used by the imaging IR.
pub type Affine = kurbo::Affine;

/// Stroke parameters; a re-export of [`kurbo::Stroke`].
pub type StrokeStyle = kurbo::Stroke;

/// A simple axis-aligned rectangle in f32 coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RectF {
    /// Minimum X coordinate.
    pub x0: f32,
    /// Minimum Y coordinate.
    pub y0: f32,
    /// Maximum X coordinate.
    pub x1: f32,
    /// Maximum Y coordinate.
    pub y1: f32,
}

impl RectF {
    /// Create a new rectangle from min/max corners.
    #[inline]
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the rectangle.
    #[inline]
    pub fn width(self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    #[inline]
    pub fn height(self) -> f32 {
        self.y1 - self.y0
    }
}

/// An axis-aligned rectangle with one corner radius for all corners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RoundedRectF {
    /// The underlying axis-aligned rectangle.
    pub rect: RectF,
    /// Radius shared by all four corners.
    pub radius: f32,
}

impl RoundedRectF {
    /// Create a new rounded rectangle from corners and a radius.
    #[inline]
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32, radius: f32) -> Self {
        Self {
            rect: RectF::new(x0, y0, x1, y1),
            radius,
        }
    }
}

/// A clipping layer scope.
///
/// Layers are well-nested: every [`StateOp::PushLayer`] must be matched by a
/// [`StateOp::PopLayer`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayerOp {
    /// Clip for the layer contents, in coordinates of the current transform.
    pub clip: RectF,
}

/// State operations that mutate the current imaging state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateOp {
    /// Set the current transform matrix.
    SetTransform(Affine),
    /// Push a new layer onto the layer stack.
    PushLayer(LayerOp),
    /// Pop the most recently pushed layer.
    PopLayer,
    /// Set the current paint resource.
    SetPaint(PaintId),
    /// Set the current stroke style.
    SetStroke(StrokeStyle),
}

/// Draw operations that produce pixels given the current state.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Stroke the given path with the current stroke and paint.
    StrokePath(PathId),
    /// Fill a rounded rectangle with the current paint.
    FillRoundedRect(RoundedRectF),
    /// Draw a nested picture with an explicit transform.
    ///
    /// The picture is replayed with isolated state; `transform` is applied on
    /// top of the current transform.
    DrawPicture {
        /// Picture resource to draw.
        picture: PictureId,
        /// Transform applied to the picture.
        transform: Affine,
    },
}

/// Description of a path resource.
#[derive(Clone, Debug)]
pub struct PathDesc {
    /// Command buffer describing the path geometry.
    pub commands: Box<[PathCmd]>,
}

/// Path command enumeration.
///
/// Rulers only need straight segments.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathCmd {
    /// Move the current point without drawing.
    MoveTo {
        /// X coordinate of the new point.
        x: f32,
        /// Y coordinate of the new point.
        y: f32,
    },
    /// Draw a line from the current point to the given point.
    LineTo {
        /// X coordinate of the line end.
        x: f32,
        /// Y coordinate of the line end.
        y: f32,
    },
}

/// Description of a paint resource.
#[derive(Clone, Debug)]
pub struct PaintDesc {
    /// Brush used when rendering.
    pub brush: Brush,
}

/// Description of a picture resource.
#[derive(Clone, Debug)]
pub struct PictureDesc {
    /// Recorded imaging program.
    pub recording: RecordedOps,
}

/// Recorded imaging operations.
///
/// Recordings are bound to the resource environment that produced them: the
/// referenced path, paint, and picture ids must stay alive while the recording
/// is replayed.
#[derive(Clone, Debug)]
pub struct RecordedOps {
    /// Captured operations, in issue order.
    pub ops: Arc<[ImagingOp]>,
}

/// Resource lifetime interface.
///
/// Implementations must keep an id referring to the same logical resource
/// until the matching `destroy_*` call.
pub trait ResourceBackend {
    /// Create a path resource.
    fn create_path(&mut self, desc: PathDesc) -> PathId;
    /// Destroy a previously created path.
    fn destroy_path(&mut self, id: PathId);

    /// Create a paint resource.
    fn create_paint(&mut self, desc: PaintDesc) -> PaintId;
    /// Replace the description behind an existing paint id.
    ///
    /// Every recording and picture referencing `id` picks up the new brush on
    /// its next replay. Unknown ids are ignored.
    fn update_paint(&mut self, id: PaintId, desc: PaintDesc);
    /// Destroy a previously created paint.
    fn destroy_paint(&mut self, id: PaintId);

    /// Create a picture resource.
    fn create_picture(&mut self, desc: PictureDesc) -> PictureId;
    /// Destroy a previously created picture.
    fn destroy_picture(&mut self, id: PictureId);
}

/// Unified imaging operation used by recordings and picture descriptions.
#[derive(Clone, Debug, PartialEq)]
pub enum ImagingOp {
    /// State-changing operation.
    State(StateOp),
    /// Drawing operation.
    Draw(DrawOp),
}

/// Minimal imaging backend trait.
pub trait ImagingBackend: ResourceBackend {
    /// Apply a state operation.
    ///
    /// Inside an active recording the operation is only captured; it does not
    /// affect the frame being drawn.
    fn state(&mut self, op: StateOp);

    /// Apply a draw operation.
    fn draw(&mut self, op: DrawOp);

    /// Begin capturing subsequent imaging operations into a recording.
    ///
    /// Callers should assume at most a single active recording. Recording may
    /// start in the middle of a frame: captured operations are withheld from
    /// that frame, so state and draws issued before and after the recording
    /// are unaffected.
    fn begin_record(&mut self);

    /// End the current recording and return the captured operations.
    fn end_record(&mut self) -> RecordedOps;

    /// Push a new layer onto the layer stack.
    #[inline]
    fn layer_push(&mut self, op: LayerOp) {
        self.state(StateOp::PushLayer(op));
    }

    /// Pop the most recently pushed layer.
    #[inline]
    fn layer_pop(&mut self) {
        self.state(StateOp::PopLayer);
    }
}

/// Scoped helpers layered on top of [`ImagingBackend`].
pub trait ImagingBackendExt: ImagingBackend {
    /// Run `f` inside a rectangular clip layer, popping it afterwards.
    fn with_clip_rect<R>(&mut self, rect: RectF, f: impl FnOnce(&mut Self) -> R) -> R {
        self.layer_push(LayerOp { clip: rect });
        let out = f(self);
        self.layer_pop();
        out
    }
}

impl<B: ImagingBackend + ?Sized> ImagingBackendExt for B {}

/// Record a sequence of imaging operations into a [`RecordedOps`].
///
/// Operations issued by `f` are captured only; `backend` draws nothing for
/// them until the recording is replayed.
pub fn record_ops<B, F>(backend: &mut B, f: F) -> RecordedOps
where
    B: ImagingBackend + ?Sized,
    F: FnOnce(&mut B),
{
    backend.begin_record();
    f(backend);
    backend.end_record()
}

/// Record imaging operations into a new picture resource.
pub fn record_picture<B, F>(backend: &mut B, f: F) -> PictureId
where
    B: ImagingBackend + ?Sized,
    F: FnOnce(&mut B),
{
    let recording = record_ops(backend, f);
    backend.create_picture(PictureDesc { recording })
}

/// Draw `picture` `count` times, instance `k` translated by `k × step`.
///
/// `origin` positions instance zero. This is the imaging-IR form of a
/// replicator layer: the backend receives one [`DrawOp::DrawPicture`] per
/// instance and no new geometry.
pub fn draw_picture_repeated<B>(
    backend: &mut B,
    picture: PictureId,
    origin: Affine,
    count: u32,
    step: Vec2,
) where
    B: ImagingBackend + ?Sized,
{
    for k in 0..count {
        let offset = step * f64::from(k);
        backend.draw(DrawOp::DrawPicture {
            picture,
            transform: Affine::translate(offset) * origin,
        });
    }
}

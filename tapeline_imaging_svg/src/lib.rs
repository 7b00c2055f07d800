// Copyright 2025 the Tapeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG export backend for the Tapeline imaging IR.
//!
//! [`SvgBackend`] implements [`ImagingBackend`] and [`ResourceBackend`] by
//! recording imaging ops, and [`SvgBackend::to_svg`] turns the recording into
//! an SVG document. It is intended for inspection and snapshot tests, not
//! pixel-perfect rendering:
//! - Only solid brushes are supported; other brushes fall back to black.
//! - Pictures are expanded inline as transformed `<g>` groups, one per
//!   [`DrawOp::DrawPicture`].
//! - Recordings are cut out of the op stream when they end, so a picture
//!   recorded in the middle of a frame only shows up where it is drawn.
//! - Text is not part of the imaging IR. Callers that need numerals (ruler
//!   labels, readouts) add them with [`SvgBackend::push_text`]; text runs are
//!   centred on their anchor and written after all recorded ops.
//!
//! ```
//! use peniko::{Brush, Color};
//! use tapeline_imaging::{
//!     DrawOp, ImagingBackend, PaintDesc, ResourceBackend, RoundedRectF, StateOp,
//! };
//! use tapeline_imaging_svg::SvgBackend;
//!
//! let mut backend = SvgBackend::default();
//! let paint = backend.create_paint(PaintDesc { brush: Brush::Solid(Color::BLACK) });
//! backend.state(StateOp::SetPaint(paint));
//! backend.draw(DrawOp::FillRoundedRect(RoundedRectF::new(0.0, -2.0, 5.0, 43.0, 2.5)));
//! assert!(backend.to_svg(100, 69).contains("<rect"));
//! ```

#![no_std]

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Write as _;
use kurbo::{Cap, Join};
use peniko::{Brush, Color};
use tapeline_imaging::{
    Affine, DrawOp, ImagingBackend, ImagingOp, PaintDesc, PaintId, PathCmd, PathDesc,
    PathId, PictureDesc, PictureId, RecordedOps, RectF, ResourceBackend, StateOp, StrokeStyle,
};

/// A single centred line of text written on top of the recorded imaging ops.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgText {
    /// Text content; XML special characters are escaped on export.
    pub content: String,
    /// Horizontal centre in document space.
    pub x: f64,
    /// Baseline Y coordinate in document space.
    pub y: f64,
    /// Font size in document units.
    pub font_size: f32,
    /// Fill color.
    pub color: Color,
}

#[derive(Clone, Debug)]
struct SvgState {
    transform: Affine,
    paint: Option<PaintId>,
    stroke: Option<StrokeStyle>,
}

impl Default for SvgState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            paint: None,
            stroke: None,
        }
    }
}

/// A recording SVG backend.
#[derive(Default, Debug)]
pub struct SvgBackend {
    paths: Vec<Option<PathDesc>>,
    paints: Vec<Option<PaintDesc>>,
    pictures: Vec<Option<PictureDesc>>,

    ops: Vec<ImagingOp>,
    texts: Vec<SvgText>,
    recording_start: Option<usize>,
}

impl SvgBackend {
    /// Clears the recorded ops and text runs while retaining resources.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
        self.texts.clear();
        self.recording_start = None;
    }

    /// Returns the recorded imaging ops.
    pub fn ops(&self) -> &[ImagingOp] {
        &self.ops
    }

    /// Returns the text runs queued with [`SvgBackend::push_text`].
    pub fn texts(&self) -> &[SvgText] {
        &self.texts
    }

    /// Returns the description of a live path resource.
    pub fn path(&self, id: PathId) -> Option<&PathDesc> {
        self.paths.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Returns the description of a live paint resource.
    pub fn paint(&self, id: PaintId) -> Option<&PaintDesc> {
        self.paints.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Returns the description of a live picture resource.
    pub fn picture(&self, id: PictureId) -> Option<&PictureDesc> {
        self.pictures.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Number of live path resources.
    pub fn live_path_count(&self) -> usize {
        self.paths.iter().filter(|p| p.is_some()).count()
    }

    /// Queue a text run to be written on top of the recorded ops.
    pub fn push_text(&mut self, text: SvgText) {
        self.texts.push(text);
    }

    /// Export the currently recorded ops and text as an SVG document.
    ///
    /// `width`/`height` are used both as the SVG `width`/`height` attributes and to set
    /// `viewBox="0 0 width height"`.
    pub fn to_svg(&self, width: u32, height: u32) -> String {
        let mut defs = String::new();
        let mut clip_counter = 0_u64;
        let mut body = render_ops(self, &mut defs, &mut clip_counter, &self.ops);
        for text in &self.texts {
            write_text(&mut body, text);
        }

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
        );
        if !defs.is_empty() {
            svg.push_str("<defs>");
            svg.push_str(&defs);
            svg.push_str("</defs>");
        }
        svg.push_str(&body);
        svg.push_str("</svg>");
        svg
    }
}

fn next_id(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("SvgBackend: too many {what} for a u32 id"))
}

impl ResourceBackend for SvgBackend {
    fn create_path(&mut self, desc: PathDesc) -> PathId {
        let id = next_id(self.paths.len(), "paths");
        self.paths.push(Some(desc));
        PathId(id)
    }

    fn destroy_path(&mut self, id: PathId) {
        if let Some(slot) = self.paths.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    fn create_paint(&mut self, desc: PaintDesc) -> PaintId {
        let id = next_id(self.paints.len(), "paints");
        self.paints.push(Some(desc));
        PaintId(id)
    }

    fn update_paint(&mut self, id: PaintId, desc: PaintDesc) {
        if let Some(slot @ Some(_)) = self.paints.get_mut(id.0 as usize) {
            *slot = Some(desc);
        }
    }

    fn destroy_paint(&mut self, id: PaintId) {
        if let Some(slot) = self.paints.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    fn create_picture(&mut self, desc: PictureDesc) -> PictureId {
        let id = next_id(self.pictures.len(), "pictures");
        self.pictures.push(Some(desc));
        PictureId(id)
    }

    fn destroy_picture(&mut self, id: PictureId) {
        if let Some(slot) = self.pictures.get_mut(id.0 as usize) {
            *slot = None;
        }
    }
}

impl ImagingBackend for SvgBackend {
    fn state(&mut self, op: StateOp) {
        self.ops.push(ImagingOp::State(op));
    }

    fn draw(&mut self, op: DrawOp) {
        self.ops.push(ImagingOp::Draw(op));
    }

    fn begin_record(&mut self) {
        self.recording_start = Some(self.ops.len());
    }

    fn end_record(&mut self) -> RecordedOps {
        let start = self.recording_start.take().unwrap_or(self.ops.len());
        let captured: Vec<ImagingOp> = self.ops.drain(start..).collect();
        RecordedOps {
            ops: Arc::from(captured),
        }
    }
}

/// Render a flat op list into SVG body markup.
///
/// Nested pictures re-enter this function with a fresh state, matching replay
/// semantics; the clip counter is shared so ids stay unique document-wide.
fn render_ops(
    backend: &SvgBackend,
    defs: &mut String,
    clip_counter: &mut u64,
    ops: &[ImagingOp],
) -> String {
    let mut body = String::new();
    let mut depth = 0_usize;
    let mut state = SvgState::default();

    for op in ops {
        match op {
            ImagingOp::State(state_op) => match state_op {
                StateOp::SetTransform(xf) => state.transform = *xf,
                StateOp::SetPaint(id) => state.paint = Some(*id),
                StateOp::SetStroke(style) => state.stroke = Some(style.clone()),
                StateOp::PushLayer(layer) => {
                    *clip_counter += 1;
                    let clip_id = format!("clip{clip_counter}");
                    write_clip_def(defs, &clip_id, layer.clip, state.transform);
                    let _ = write!(body, "<g clip-path=\"url(#{clip_id})\">");
                    depth += 1;
                }
                StateOp::PopLayer => {
                    assert!(depth > 0, "PopLayer underflow in SVG backend");
                    depth -= 1;
                    body.push_str("</g>");
                }
            },
            ImagingOp::Draw(draw_op) => {
                write_draw_op(backend, defs, clip_counter, &mut body, draw_op, &state);
            }
        }
    }

    for _ in 0..depth {
        body.push_str("</g>");
    }
    body
}

fn write_clip_def(defs: &mut String, id: &str, rect: RectF, transform: Affine) {
    let attrs = svg_transform_attr(transform);
    let _ = write!(
        defs,
        "<clipPath id=\"{id}\" clipPathUnits=\"userSpaceOnUse\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{attrs}/></clipPath>",
        fmt_f32(rect.x0),
        fmt_f32(rect.y0),
        fmt_f32(rect.width()),
        fmt_f32(rect.height()),
    );
}

fn svg_transform_attr(transform: Affine) -> String {
    let mut attrs = String::new();
    if transform != Affine::IDENTITY {
        let _ = write!(attrs, " transform=\"{}\"", affine_to_svg_matrix(transform));
    }
    attrs
}

fn write_draw_op(
    backend: &SvgBackend,
    defs: &mut String,
    clip_counter: &mut u64,
    out: &mut String,
    op: &DrawOp,
    state: &SvgState,
) {
    let attrs = svg_transform_attr(state.transform);
    match op {
        DrawOp::FillRoundedRect(rr) => {
            let style = style_for_paint(backend, state, PaintKind::Fill);
            let _ = write!(
                out,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{r}\" ry=\"{r}\"{attrs}{style}/>",
                fmt_f32(rr.rect.x0),
                fmt_f32(rr.rect.y0),
                fmt_f32(rr.rect.width()),
                fmt_f32(rr.rect.height()),
                r = fmt_f32(rr.radius),
            );
        }
        DrawOp::StrokePath(path_id) => {
            if let Some(path) = backend.path(*path_id) {
                let d = path_to_svg_d(path);
                let style = style_for_paint(backend, state, PaintKind::Stroke);
                let _ = write!(out, "<path d=\"{d}\"{attrs}{style}/>");
            }
        }
        DrawOp::DrawPicture { picture, transform } => {
            if let Some(desc) = backend.picture(*picture) {
                let outer = state.transform * *transform;
                let _ = write!(out, "<g transform=\"{}\">", affine_to_svg_matrix(outer));
                let nested = render_ops(backend, defs, clip_counter, &desc.recording.ops);
                out.push_str(&nested);
                out.push_str("</g>");
            }
        }
    }
}

#[derive(Copy, Clone)]
enum PaintKind {
    Fill,
    Stroke,
}

fn style_for_paint(backend: &SvgBackend, state: &SvgState, kind: PaintKind) -> String {
    let color = state
        .paint
        .and_then(|id| backend.paint(id))
        .and_then(|desc| match &desc.brush {
            Brush::Solid(color) => Some(*color),
            _ => None,
        })
        .unwrap_or(Color::BLACK);
    let (rgb, a) = color_to_svg(color);

    let mut out = String::new();
    match kind {
        PaintKind::Fill => {
            let _ = write!(out, " fill=\"{rgb}\" stroke=\"none\"");
            if a < 1.0 {
                let _ = write!(out, " fill-opacity=\"{}\"", fmt_f32(a));
            }
        }
        PaintKind::Stroke => {
            let _ = write!(out, " fill=\"none\" stroke=\"{rgb}\"");
            if a < 1.0 {
                let _ = write!(out, " stroke-opacity=\"{}\"", fmt_f32(a));
            }
            if let Some(stroke) = state.stroke.as_ref() {
                let _ = write!(out, " stroke-width=\"{}\"", fmt_f64_to_f32(stroke.width));
                // SVG has a single linecap, while kurbo can specify start/end caps.
                let _ = write!(
                    out,
                    " stroke-linecap=\"{}\"",
                    stroke_cap_svg(stroke.start_cap)
                );
                let _ = write!(out, " stroke-linejoin=\"{}\"", stroke_join_svg(stroke.join));
            }
        }
    }
    out
}

fn write_text(out: &mut String, text: &SvgText) {
    let (rgb, a) = color_to_svg(text.color);
    let _ = write!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"{}\" text-anchor=\"middle\" fill=\"{rgb}\"",
        fmt_f64_to_f32(text.x),
        fmt_f64_to_f32(text.y),
        fmt_f32(text.font_size),
    );
    if a < 1.0 {
        let _ = write!(out, " fill-opacity=\"{}\"", fmt_f32(a));
    }
    out.push('>');
    for ch in text.content.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out.push_str("</text>");
}

fn stroke_cap_svg(cap: Cap) -> &'static str {
    match cap {
        Cap::Butt => "butt",
        Cap::Round => "round",
        Cap::Square => "square",
    }
}

fn stroke_join_svg(join: Join) -> &'static str {
    match join {
        Join::Miter => "miter",
        Join::Round => "round",
        Join::Bevel => "bevel",
    }
}

fn color_to_svg(color: Color) -> (String, f32) {
    let rgba = color.to_rgba8();
    let a = f32::from(rgba.a) / 255.0;
    (format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b), a)
}

fn affine_to_svg_matrix(xf: Affine) -> String {
    // kurbo::Affine stores [a, b, c, d, e, f] corresponding to:
    // [ a c e ]
    // [ b d f ]
    // [ 0 0 1 ]
    let c = xf.as_coeffs();
    format!(
        "matrix({} {} {} {} {} {})",
        fmt_f64_to_f32(c[0]),
        fmt_f64_to_f32(c[1]),
        fmt_f64_to_f32(c[2]),
        fmt_f64_to_f32(c[3]),
        fmt_f64_to_f32(c[4]),
        fmt_f64_to_f32(c[5]),
    )
}

fn path_to_svg_d(path: &PathDesc) -> String {
    let mut d = String::new();
    for cmd in path.commands.iter() {
        match *cmd {
            PathCmd::MoveTo { x, y } => {
                let _ = write!(d, "M{} {}", fmt_f32(x), fmt_f32(y));
            }
            PathCmd::LineTo { x, y } => {
                let _ = write!(d, "L{} {}", fmt_f32(x), fmt_f32(y));
            }
        }
    }
    d
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "SVG uses f32-like scalar formatting"
)]
fn fmt_f64_to_f32(v: f64) -> String {
    fmt_f32(v as f32)
}

fn fmt_f32(v: f32) -> String {
    // Keep output readable and stable enough for snapshots.
    if !v.is_finite() {
        return format!("{v}");
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "best-effort pretty formatting"
    )]
    let i = v as i32;
    let diff = (i as f32) - v;
    if diff > -1e-6 && diff < 1e-6 {
        return format!("{i}");
    }

    let mut s = format!("{v:.3}");
    while s.contains('.') && s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use kurbo::Vec2;
    use tapeline_imaging::{
        ImagingBackendExt, PaintDesc, RoundedRectF, draw_picture_repeated, record_picture,
    };

    fn solid(r: u8, g: u8, b: u8) -> PaintDesc {
        PaintDesc {
            brush: Brush::Solid(Color::from_rgba8(r, g, b, 255)),
        }
    }

    fn square() -> DrawOp {
        DrawOp::FillRoundedRect(RoundedRectF::new(10.0, 20.0, 30.0, 40.0, 0.0))
    }

    #[test]
    fn exports_basic_svg() {
        let mut backend = SvgBackend::default();
        let paint = backend.create_paint(solid(255, 0, 0));
        backend.state(StateOp::SetPaint(paint));
        backend.draw(square());
        let svg = backend.to_svg(100, 80);
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<rect x=\"10\" y=\"20\" width=\"20\" height=\"20\""));
        assert!(svg.contains("fill=\"#ff0000\""));
    }

    #[test]
    fn rounded_rect_has_radii() {
        let mut backend = SvgBackend::default();
        backend.draw(DrawOp::FillRoundedRect(RoundedRectF::new(
            0.0, -2.0, 5.0, 43.0, 2.5,
        )));
        let svg = backend.to_svg(10, 50);
        assert!(svg.contains("rx=\"2.5\" ry=\"2.5\""));
        assert!(svg.contains("y=\"-2\""));
    }

    #[test]
    fn pictures_expand_per_instance() {
        let mut backend = SvgBackend::default();
        let paint = backend.create_paint(solid(0, 0, 0));
        let path = backend.create_path(PathDesc {
            commands: vec![
                PathCmd::MoveTo { x: 0.5, y: 0.0 },
                PathCmd::LineTo { x: 0.5, y: 44.0 },
            ]
            .into_boxed_slice(),
        });
        let picture = record_picture(&mut backend, |b| {
            b.state(StateOp::SetPaint(paint));
            b.state(StateOp::SetStroke(StrokeStyle::new(1.0)));
            b.draw(DrawOp::StrokePath(path));
        });
        assert!(backend.ops().is_empty(), "recording is not drawn");

        draw_picture_repeated(
            &mut backend,
            picture,
            Affine::IDENTITY,
            3,
            Vec2::new(100.0, 0.0),
        );
        let svg = backend.to_svg(300, 69);
        assert_eq!(svg.matches("<path d=\"M0.5 0L0.5 44\"").count(), 3);
        assert!(svg.contains("matrix(1 0 0 1 200 0)"));
        assert!(svg.contains("stroke-width=\"1\""));
    }

    #[test]
    fn paint_update_recolors_existing_picture() {
        let mut backend = SvgBackend::default();
        let paint = backend.create_paint(solid(0, 0, 0));
        let picture = record_picture(&mut backend, |b| {
            b.state(StateOp::SetPaint(paint));
            b.draw(square());
        });
        backend.update_paint(paint, solid(0, 0, 255));
        backend.draw(DrawOp::DrawPicture {
            picture,
            transform: Affine::IDENTITY,
        });
        let svg = backend.to_svg(10, 10);
        assert!(svg.contains("fill=\"#0000ff\""));
        assert!(!svg.contains("fill=\"#000000\""));
    }

    #[test]
    fn update_of_destroyed_paint_is_ignored() {
        let mut backend = SvgBackend::default();
        let paint = backend.create_paint(solid(0, 0, 0));
        backend.destroy_paint(paint);
        backend.update_paint(paint, solid(255, 255, 255));
        assert!(backend.paint(paint).is_none());
    }

    #[test]
    fn clip_layers_emit_defs() {
        let mut backend = SvgBackend::default();
        backend.with_clip_rect(RectF::new(0.0, 0.0, 50.0, 69.0), |b| b.draw(square()));
        let svg = backend.to_svg(50, 69);
        assert!(svg.contains("<clipPath id=\"clip1\""));
        assert!(svg.contains("clip-path=\"url(#clip1)\""));
        assert!(svg.ends_with("</g></svg>"));
    }

    #[test]
    fn recording_mid_frame_draws_only_where_replayed() {
        let mut backend = SvgBackend::default();
        let paint = backend.create_paint(solid(0, 0, 0));
        backend.state(StateOp::SetTransform(Affine::translate((7.0, 0.0))));
        let picture = record_picture(&mut backend, |b| {
            b.state(StateOp::SetPaint(paint));
            b.draw(square());
        });
        backend.draw(DrawOp::DrawPicture {
            picture,
            transform: Affine::IDENTITY,
        });
        let svg = backend.to_svg(50, 50);
        assert_eq!(svg.matches("<rect").count(), 1);
        assert!(svg.contains("<g transform=\"matrix(1 0 0 1 7 0)\"><rect"));
    }

    #[test]
    fn text_runs_are_escaped_and_centred() {
        let mut backend = SvgBackend::default();
        backend.push_text(SvgText {
            content: "<12>".to_string(),
            x: 100.0,
            y: 64.0,
            font_size: 17.0,
            color: Color::BLACK,
        });
        let svg = backend.to_svg(200, 69);
        assert!(svg.contains("text-anchor=\"middle\""));
        assert!(svg.contains("&lt;12&gt;</text>"));
    }
}

// Copyright 2025 the Tapeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for painting `tapeline_ruler` surfaces.
//!
//! Painting a surface records the tick cell once and then emits one
//! `DrawPicture` per unit, so cost should grow with the number of instances
//! and nothing else.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Affine;

use tapeline_imaging_svg::SvgBackend;
use tapeline_length::Unit;
use tapeline_ruler::{RulerConfig, RulerControl, RulerSurface};

const LENGTHS: [f64; 4] = [1.0, 10.0, 100.0, 1_000.0];

fn bench_surface_paint(c: &mut Criterion) {
    let mut group = c.benchmark_group("surface_paint");
    for &length in &LENGTHS {
        group.bench_with_input(
            BenchmarkId::new("first_paint", length),
            &length,
            |b, &length| {
                b.iter_batched(
                    || (SvgBackend::default(), RulerSurface::new(Unit::Centimeter, length, 1.0)),
                    |(mut backend, mut surface)| {
                        surface.paint(&mut backend, Affine::IDENTITY);
                        black_box(backend.ops().len())
                    },
                    BatchSize::SmallInput,
                );
            },
        );

        group.bench_with_input(BenchmarkId::new("repaint", length), &length, |b, &length| {
            let mut backend = SvgBackend::default();
            let mut surface = RulerSurface::new(Unit::Inch, length, 1.0);
            surface.paint(&mut backend, Affine::IDENTITY);
            b.iter(|| {
                backend.clear_ops();
                surface.paint(&mut backend, Affine::IDENTITY);
                black_box(backend.ops().len())
            });
        });
    }
    group.finish();
}

fn bench_control_paint(c: &mut Criterion) {
    let mut group = c.benchmark_group("control_paint");
    for &length in &LENGTHS {
        group.bench_with_input(BenchmarkId::from_parameter(length), &length, |b, &length| {
            let mut backend = SvgBackend::default();
            let mut ruler = RulerControl::new(RulerConfig::new(Unit::Centimeter, length))
                .expect("valid ruler config");
            ruler.set_view_width(375.0);
            ruler.set_value(length / 2.0, false);
            b.iter(|| {
                backend.clear_ops();
                ruler.paint(&mut backend);
                black_box(backend.ops().len())
            });
        });
    }
    group.finish();
}

fn bench_svg_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("svg_export");
    for &length in &LENGTHS[..3] {
        let mut backend = SvgBackend::default();
        let mut surface = RulerSurface::new(Unit::Centimeter, length, 1.0);
        surface.paint(&mut backend, Affine::IDENTITY);
        group.bench_with_input(BenchmarkId::from_parameter(length), &backend, |b, backend| {
            b.iter(|| black_box(backend.to_svg(375, 69).len()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_surface_paint,
    bench_control_paint,
    bench_svg_export
);
criterion_main!(benches);

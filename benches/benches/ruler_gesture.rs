// Copyright 2025 the Tapeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for driving `tapeline_ruler` controls with gestures.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use tapeline_length::{COARSE_GRID, Unit, quantize};
use tapeline_ruler::{RulerConfig, RulerControl};

fn ruler() -> RulerControl {
    let mut ruler = RulerControl::new(RulerConfig::new(Unit::Centimeter, 200.0).with_step(0.5))
        .expect("valid ruler config");
    ruler.set_view_width(375.0);
    ruler.subscribe(|v| {
        black_box(v);
    });
    ruler
}

fn bench_drag(c: &mut Criterion) {
    c.bench_function("drag_1000_samples", |b| {
        b.iter_batched(
            ruler,
            |mut ruler| {
                ruler.begin_drag(10_000.0, 0.0);
                for i in 1..=1_000_u32 {
                    let i = f64::from(i);
                    ruler.drag_to(10_000.0 - i * 7.3, i * 16.0);
                }
                ruler.end_drag(16_000.0);
                black_box(ruler.value())
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_fling_to_rest(c: &mut Criterion) {
    c.bench_function("fling_to_rest", |b| {
        b.iter_batched(
            ruler,
            |mut ruler| {
                ruler.begin_drag(600.0, 0.0);
                ruler.drag_to(500.0, 16.0);
                ruler.drag_to(350.0, 32.0);
                ruler.end_drag(40.0);
                while ruler.tick(1.0 / 60.0) {}
                black_box(ruler.value())
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_quantize(c: &mut Criterion) {
    c.bench_function("quantize_coarse", |b| {
        let mut raw = 0.0;
        b.iter(|| {
            raw = (raw + 0.0137) % 20.0;
            black_box(quantize(black_box(raw), COARSE_GRID, 20.0))
        });
    });
}

criterion_group!(benches, bench_drag, bench_fling_to_rest, bench_quantize);
criterion_main!(benches);

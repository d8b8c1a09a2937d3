//! # Dilation Benchmarks
//!
//! Batched `dilate` across a layer schedule vs incremental queue steps.
//!
//! Run: `cargo bench --bench dilation_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wavenet_ml::prelude::*;

fn random_signal(channels: usize, length: usize) -> Array3<f64> {
    let mut rng = StdRng::seed_from_u64(0);
    Array3::from_shape_fn((1, channels, length), |_| rng.gen_range(-1.0..1.0))
}

/// Single dilate call from the undilated layout
fn bench_dilate(c: &mut Criterion) {
    let mut group = c.benchmark_group("dilate");
    let x = random_signal(32, 4096);

    for dilation in [2, 16, 512] {
        group.bench_with_input(BenchmarkId::new("from_1", dilation), &dilation, |b, &d| {
            b.iter(|| black_box(dilate(black_box(x.view()), d, 1, true)))
        });
    }

    // length not a multiple of the dilation forces the padding path
    let ragged = random_signal(32, 4000);
    group.bench_function("padded_512", |b| {
        b.iter(|| black_box(dilate(black_box(ragged.view()), 512, 1, true)))
    });

    group.finish();
}

/// Full forward schedule of a default stack
fn bench_schedule(c: &mut Criterion) {
    let config = StackConfig::default();
    let x = random_signal(config.residual_channels, 1 << 14);

    c.bench_function("dilation_schedule_40_layers", |b| {
        b.iter(|| {
            let mut y = x.clone();
            for (init, d) in config.dilation_schedule() {
                y = dilate(y.view(), d, init, true).unwrap_or(y);
            }
            black_box(y)
        })
    });
}

/// One enqueue + dequeue per layer, as during generation
fn bench_queue_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_step");
    let channels = 32;
    let sample = Array1::from_elem(channels, 0.25);

    for dilation in [1, 64, 512] {
        let mut queue = DilatedQueue::new(2 * dilation, channels, dilation, 2).unwrap();
        group.bench_with_input(BenchmarkId::new("single_layer", dilation), &dilation, |b, _| {
            b.iter(|| {
                queue.enqueue(sample.view()).unwrap();
                black_box(queue.dequeue_default())
            })
        });
    }

    let mut stack = QueueStack::from_config(&StackConfig::default()).unwrap();
    group.bench_function("default_stack", |b| {
        b.iter(|| {
            for queue in stack.iter_mut() {
                queue.enqueue(sample.view()).unwrap();
                black_box(queue.dequeue_default());
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_dilate, bench_schedule, bench_queue_step);
criterion_main!(benches);

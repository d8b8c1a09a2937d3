//! # Mixture-of-Logistics Benchmarks
//!
//! Loss and sampling throughput for a (batch, time, 3·nr_mix) parameter tensor.
//!
//! Run: `cargo bench --bench mixture_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array2, Array3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wavenet_ml::prelude::*;

fn random_params(rng: &mut StdRng, batch: usize, length: usize, nr_mix: usize) -> Array3<f64> {
    Array3::from_shape_fn((batch, length, 3 * nr_mix), |(_, _, k)| {
        if k < 2 * nr_mix {
            rng.gen_range(-1.0..1.0)
        } else {
            rng.gen_range(-7.0..0.0)
        }
    })
}

fn bench_loss(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixture_loss");
    let mut rng = StdRng::seed_from_u64(1);
    let config = MixtureConfig::default();

    for nr_mix in [1, 10] {
        let params = random_params(&mut rng, 4, 1024, nr_mix).into_dyn();
        let target = Array2::from_shape_fn((4, 1024), |_| rng.gen_range(-1.0..=1.0)).into_dyn();
        group.bench_with_input(BenchmarkId::new("sum", nr_mix), &nr_mix, |b, _| {
            b.iter(|| {
                black_box(discretized_mix_logistic_loss(
                    params.view(),
                    target.view(),
                    &config,
                    Reduction::Sum,
                ))
            })
        });
    }

    group.finish();
}

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixture_sample");
    let mut rng = StdRng::seed_from_u64(2);
    let config = MixtureConfig::default();

    // one row per step is the generation case
    let single = random_params(&mut rng, 1, 1, 10).into_dyn();
    group.bench_function("single_row", |b| {
        b.iter(|| black_box(sample_from_discretized_mix_logistic(single.view(), &config, &mut rng)))
    });

    let batch = random_params(&mut rng, 4, 1024, 10).into_dyn();
    group.bench_function("batch_4096", |b| {
        b.iter(|| black_box(sample_from_discretized_mix_logistic(batch.view(), &config, &mut rng)))
    });

    group.finish();
}

criterion_group!(benches, bench_loss, bench_sample);
criterion_main!(benches);

#![allow(missing_docs)]
//! Benchmarks for the noise tower.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use strata_utils::noise::{BlendedNoise, DoublePerlinNoise};
use strata_utils::random::{Random, Xoroshiro};

const SEED: u64 = 12345;

fn bench_double_perlin(c: &mut Criterion) {
    let mut rng = Xoroshiro::from_seed(SEED);
    let splitter = rng.next_positional();
    let noise = DoublePerlinNoise::create(&splitter, "bench", -7, &[1.0, 1.0, 1.0, 1.0]);

    c.bench_function("double_perlin_sample", |b| {
        let mut i = 0i32;
        b.iter(|| {
            i = i.wrapping_add(1);
            black_box(noise.sample(f64::from(i), 64.0, f64::from(-i)))
        });
    });
}

fn bench_blended(c: &mut Criterion) {
    let mut rng = Xoroshiro::from_seed(SEED);
    let noise = BlendedNoise::new(&mut rng, 0.25, 0.125, 80.0, 160.0, 8.0);

    c.bench_function("blended_noise_compute", |b| {
        let mut i = 0i32;
        b.iter(|| {
            i = i.wrapping_add(1);
            black_box(noise.compute(i, 64, -i))
        });
    });
}

criterion_group!(benches, bench_double_perlin, bench_blended);
criterion_main!(benches);

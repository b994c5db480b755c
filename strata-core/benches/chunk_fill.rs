#![allow(missing_docs)]
//! Benchmarks for whole-chunk generation.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

use strata_core::TerrainGenerator;
use strata_core::beardifier::NoStructures;
use strata_core::biome::{Biome, BiomeCatalog, BiomeId, FixedBiomeSource, SurfaceCorrection};
use strata_core::chunk::ChunkPos;
use strata_core::config::{GeneratorSettings, VeinFamily};
use strata_core::material::{MaterialId, Materials};
use strata_core::surface::rules::RuleTreeBuilder;

const SEED: u64 = 12345;

fn vein(base: u16, min_y: i32, max_y: i32) -> VeinFamily {
    VeinFamily {
        ore: MaterialId(base),
        deep_ore: MaterialId(base + 1),
        raw_ore: MaterialId(base + 2),
        filler: MaterialId(base + 3),
        min_y,
        max_y,
    }
}

fn create_generator() -> TerrainGenerator {
    let materials = Materials {
        air: MaterialId(0),
        stone: MaterialId(1),
        deep_stone: MaterialId(2),
        water: MaterialId(3),
        lava: MaterialId(4),
        bedrock: MaterialId(5),
        ice: MaterialId(6),
        packed_ice: MaterialId(7),
        snow: MaterialId(8),
    };
    let settings = GeneratorSettings::overworld(
        materials,
        vein(10, 0, 50),
        vein(20, -60, -8),
    );
    let catalog = Arc::new(BiomeCatalog::new(vec![Biome {
        depth: 0.125,
        scale: 0.05,
        temperature: 0.8,
        exaggerated: false,
        surface_correction: SurfaceCorrection::None,
    }]));

    let mut builder = RuleTreeBuilder::new();
    let root = builder.sequence(Vec::new());
    let tree = builder.build(root);

    TerrainGenerator::new(
        SEED,
        settings,
        catalog,
        Arc::new(FixedBiomeSource { biome: BiomeId(0) }),
        Arc::new(NoStructures),
        tree,
        MaterialId(30),
        &[],
    )
    .expect("settings validate")
}

fn bench_fill_chunk(c: &mut Criterion) {
    let generator = create_generator();

    let mut group = c.benchmark_group("fill_chunk");
    for (x, z) in [(0, 0), (100, 100), (1000, 1000)] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{x}_{z}")),
            &(x, z),
            |b, &(x, z)| {
                b.iter(|| {
                    let chunk = generator.new_chunk(ChunkPos::new(x, z));
                    generator.fill_chunk(&chunk);
                    black_box(chunk)
                });
            },
        );
    }
    group.finish();
}

fn bench_full_generation(c: &mut Criterion) {
    let generator = create_generator();

    c.bench_function("generate_chunk", |b| {
        b.iter(|| {
            let chunk = generator.new_chunk(ChunkPos::new(7, -3));
            generator.generate_chunk(&chunk);
            black_box(chunk)
        });
    });
}

criterion_group!(benches, bench_fill_chunk, bench_full_generation);
criterion_main!(benches);

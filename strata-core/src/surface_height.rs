//! Preliminary surface level: a coarse, cached estimate of ground height
//! computed from the uncarved density, available before any heightmap
//! exists.

use rustc_hash::FxHashMap;

use crate::density::TerrainSampler;

/// Density above which a coarse point reads as ground.
const SURFACE_DENSITY_CUTOFF: f64 = 0.390_625;

/// Columns are quantized to this many blocks for caching.
const COLUMN_QUANT_SHIFT: i32 = 2;

/// Per-chunk surface height estimator.
///
/// Scans the uncarved density top-down at cell-height steps and memoizes
/// per quantized column. Deliberately ignores caves and structure bias:
/// the aquifer needs the broad ground line, not the carved one.
pub struct SurfaceHeightEstimator<'a> {
    sampler: &'a TerrainSampler,
    cache: FxHashMap<i64, i32>,
    min_y: i32,
    max_y: i32,
    step: i32,
}

impl<'a> SurfaceHeightEstimator<'a> {
    /// Creates an estimator scanning `[min_y, max_y]` at `step`-block
    /// resolution (the vertical cell size).
    #[must_use]
    pub fn new(sampler: &'a TerrainSampler, min_y: i32, max_y: i32, step: i32) -> Self {
        Self {
            sampler,
            cache: FxHashMap::default(),
            min_y,
            max_y,
            step,
        }
    }

    /// Estimated surface height for the column containing `(x, z)`.
    pub fn estimate(&mut self, x: i32, z: i32) -> i32 {
        let quant_x = (x >> COLUMN_QUANT_SHIFT) << COLUMN_QUANT_SHIFT;
        let quant_z = (z >> COLUMN_QUANT_SHIFT) << COLUMN_QUANT_SHIFT;
        let key = pack_column(quant_x, quant_z);

        if let Some(&height) = self.cache.get(&key) {
            return height;
        }

        let height = self.scan_column(quant_x, quant_z);
        self.cache.insert(key, height);
        height
    }

    /// Highest scanned Y whose density reads as ground.
    fn scan_column(&self, x: i32, z: i32) -> i32 {
        let top = (self.max_y / self.step) * self.step;
        if top <= self.min_y {
            return self.min_y;
        }

        let mut y = top;
        while y >= self.min_y {
            if self.sampler.density(x, y, z) > SURFACE_DENSITY_CUTOFF {
                return y;
            }
            y -= self.step;
        }

        self.min_y
    }
}

#[inline]
fn pack_column(x: i32, z: i32) -> i64 {
    (i64::from(x) & 0xFFFF_FFFF) | ((i64::from(z) & 0xFFFF_FFFF) << 32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{Biome, BiomeCatalog, BiomeId, FixedBiomeSource, SurfaceCorrection};
    use crate::config::{BodyNoiseSettings, GeneratorSettings, VeinFamily};
    use crate::material::{MaterialId, Materials};
    use std::sync::Arc;
    use strata_utils::random::{Random, Xoroshiro};

    fn sampler() -> TerrainSampler {
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
        let vein = VeinFamily {
            ore: MaterialId(10),
            deep_ore: MaterialId(11),
            raw_ore: MaterialId(12),
            filler: MaterialId(13),
            min_y: 0,
            max_y: 50,
        };
        let mut settings = GeneratorSettings::overworld(materials, vein.clone(), vein);
        settings.body_noise = BodyNoiseSettings::Constant(0.0);
        settings.density_offset = 0.0;
        settings.top_slide.from_y = settings.top_slide.to_y;
        settings.bottom_slide.from_y = settings.bottom_slide.to_y;

        let catalog = Arc::new(BiomeCatalog::new(vec![Biome {
            depth: 0.0,
            scale: 0.05,
            temperature: 0.8,
            exaggerated: false,
            surface_correction: SurfaceCorrection::None,
        }]));
        let source = Arc::new(FixedBiomeSource { biome: BiomeId(0) });
        let mut random = Xoroshiro::from_seed(12345);
        TerrainSampler::new(&mut random, &settings, catalog, source)
    }

    #[test]
    fn test_flat_world_estimate_near_anchor() {
        let sampler = sampler();
        let mut estimator = SurfaceHeightEstimator::new(&sampler, -64, 320, 8);
        let height = estimator.estimate(0, 0);
        // The anchor sits at 64; the cutoff puts the last ground step one
        // cell at most below it.
        assert!((40..=64).contains(&height), "estimate {height} off anchor");
    }

    #[test]
    fn test_cache_is_consistent() {
        let sampler = sampler();
        let mut estimator = SurfaceHeightEstimator::new(&sampler, -64, 320, 8);
        let a = estimator.estimate(5, 9);
        let b = estimator.estimate(5, 9);
        assert_eq!(a, b);
        // Same quantized column.
        let c = estimator.estimate(6, 10);
        assert_eq!(a, c);
    }
}

//! Base density: biome depth/scale gradient plus the body noise, slid
//! toward fixed targets near the vertical extremes.

use std::sync::Arc;

use strata_utils::math::{clamped_map, lerp};
use strata_utils::noise::BlendedNoise;
use strata_utils::random::RandomSource;

use crate::biome::{BiomeCatalog, SharedBiomeSource};
use crate::config::{BodyNoiseSettings, GeneratorSettings, Slide};

/// Nominal surface anchor for a biome of depth 0.
const DEPTH_ANCHOR_BASE: f64 = 64.0;
/// Blocks of anchor shift per unit of biome depth.
const DEPTH_ANCHOR_SPAN: f64 = 32.0;
/// Gradient normalization in blocks.
const GRADIENT_NORM: f64 = 128.0;
/// Vertical squash derived from biome scale: `scale * 0.9 + 0.1`.
const SCALE_WEIGHT: f64 = 0.9;
const SCALE_BASE: f64 = 0.1;
/// Above the anchor the gradient steepens by this factor.
const ABOVE_SURFACE_STEEPENING: f64 = 4.0;
/// Biome blend kernel radius, in 4-block biome cells.
const BLEND_RADIUS: i32 = 2;
/// Reference Y for biome depth/scale lookups.
const BIOME_SAMPLE_Y: i32 = 0;

/// Body noise strategy.
#[derive(Debug)]
enum BodyNoise {
    Blended(BlendedNoise),
    Constant(f64),
}

impl BodyNoise {
    #[inline]
    fn compute(&self, x: i32, y: i32, z: i32) -> f64 {
        match self {
            Self::Blended(noise) => noise.compute(x, y, z),
            Self::Constant(value) => *value,
        }
    }
}

/// Coarse-point density source.
///
/// `density(x, y, z)` is a pure function of coordinates given the seed; the
/// filler samples it only at cell corners. The depth/scale term blends the
/// declared depth and scale of nearby biomes with inverse-distance weights
/// so biome borders shift the anchor smoothly rather than in steps.
pub struct TerrainSampler {
    body: BodyNoise,
    density_factor: f64,
    density_offset: f64,
    top_slide: Slide,
    bottom_slide: Slide,
    catalog: Arc<BiomeCatalog>,
    source: SharedBiomeSource,
}

impl TerrainSampler {
    /// Builds the sampler, drawing the body noise from `random` when the
    /// configuration asks for the blended tower.
    #[must_use]
    pub fn new(
        random: &mut RandomSource,
        settings: &GeneratorSettings,
        catalog: Arc<BiomeCatalog>,
        source: SharedBiomeSource,
    ) -> Self {
        let body = match &settings.body_noise {
            BodyNoiseSettings::Blended(scaling) => BodyNoise::Blended(BlendedNoise::new(
                random,
                scaling.xz_scale,
                scaling.y_scale,
                scaling.xz_factor,
                scaling.y_factor,
                scaling.smear_scale_multiplier,
            )),
            BodyNoiseSettings::Constant(value) => BodyNoise::Constant(*value),
        };

        Self {
            body,
            density_factor: settings.density_factor,
            density_offset: settings.density_offset,
            top_slide: settings.top_slide.clone(),
            bottom_slide: settings.bottom_slide.clone(),
            catalog,
            source,
        }
    }

    /// Inverse-distance-weighted depth/scale over the biome neighborhood.
    ///
    /// Neighbors deeper than the center contribute at half weight, keeping
    /// low terrain from being dragged up by a single tall neighbor.
    #[must_use]
    pub fn blended_depth_scale(&self, x: i32, z: i32) -> (f64, f64) {
        let biome_x = x >> 2;
        let biome_z = z >> 2;

        let center_id = self.source.biome_at(biome_x << 2, BIOME_SAMPLE_Y, biome_z << 2);
        let center_depth = self.catalog.get(center_id).depth;

        let mut depth_sum = 0.0;
        let mut scale_sum = 0.0;
        let mut weight_sum = 0.0;

        for dx in -BLEND_RADIUS..=BLEND_RADIUS {
            for dz in -BLEND_RADIUS..=BLEND_RADIUS {
                let id = self.source.biome_at(
                    (biome_x + dx) << 2,
                    BIOME_SAMPLE_Y,
                    (biome_z + dz) << 2,
                );
                let biome = self.catalog.get(id);

                let mut weight = 10.0 / (f64::from(dx * dx + dz * dz) + 0.2).sqrt()
                    * biome.blend_amplification();
                if biome.depth > center_depth {
                    weight /= 2.0;
                }

                depth_sum += biome.depth * weight;
                scale_sum += biome.scale * weight;
                weight_sum += weight;
            }
        }

        (depth_sum / weight_sum, scale_sum / weight_sum)
    }

    /// Uncarved density at a coarse point.
    #[must_use]
    pub fn density(&self, x: i32, y: i32, z: i32) -> f64 {
        let (depth, scale) = self.blended_depth_scale(x, z);

        let anchor = DEPTH_ANCHOR_BASE + depth * DEPTH_ANCHOR_SPAN;
        let squash = scale * SCALE_WEIGHT + SCALE_BASE;
        let mut gradient = (anchor - f64::from(y)) * self.density_factor / (GRADIENT_NORM * squash);
        if gradient < 0.0 {
            gradient *= ABOVE_SURFACE_STEEPENING;
        }

        let density = gradient + self.density_offset + self.body.compute(x, y, z);
        let density = apply_slide(density, &self.top_slide, y);
        apply_slide(density, &self.bottom_slide, y)
    }
}

/// Slides density toward `slide.target` across the band; a zero-width band
/// is a disabled slide.
fn apply_slide(density: f64, slide: &Slide, y: i32) -> f64 {
    if slide.from_y == slide.to_y {
        return density;
    }
    let factor = clamped_map(
        f64::from(y),
        f64::from(slide.from_y),
        f64::from(slide.to_y),
        1.0,
        0.0,
    );
    lerp(factor, slide.target, density)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{Biome, BiomeId, FixedBiomeSource, SurfaceCorrection};
    use crate::config::GeneratorSettings;
    use crate::material::{MaterialId, Materials};
    use strata_utils::random::{Random, Xoroshiro};

    fn materials() -> Materials {
        Materials {
            air: MaterialId(0),
            stone: MaterialId(1),
            deep_stone: MaterialId(2),
            water: MaterialId(3),
            lava: MaterialId(4),
            bedrock: MaterialId(5),
            ice: MaterialId(6),
            packed_ice: MaterialId(7),
            snow: MaterialId(8),
        }
    }

    fn vein(base: u16) -> crate::config::VeinFamily {
        crate::config::VeinFamily {
            ore: MaterialId(base),
            deep_ore: MaterialId(base + 1),
            raw_ore: MaterialId(base + 2),
            filler: MaterialId(base + 3),
            min_y: 0,
            max_y: 50,
        }
    }

    fn sampler(settings: &GeneratorSettings) -> TerrainSampler {
        let catalog = Arc::new(BiomeCatalog::new(vec![Biome {
            depth: 0.0,
            scale: 0.05,
            temperature: 0.8,
            exaggerated: false,
            surface_correction: SurfaceCorrection::None,
        }]));
        let source = Arc::new(FixedBiomeSource { biome: BiomeId(0) });
        let mut random = Xoroshiro::from_seed(12345);
        TerrainSampler::new(&mut random, settings, catalog, source)
    }

    fn flat_settings() -> GeneratorSettings {
        let mut settings = GeneratorSettings::overworld(materials(), vein(10), vein(20));
        settings.body_noise = BodyNoiseSettings::Constant(0.0);
        settings.density_offset = 0.0;
        // Zero-width bands disable both slides.
        settings.top_slide.from_y = settings.top_slide.to_y;
        settings.bottom_slide.from_y = settings.bottom_slide.to_y;
        settings
    }

    #[test]
    fn test_flat_world_surface_at_anchor() {
        let sampler = sampler(&flat_settings());
        // Depth 0 puts the anchor at y=64: solid strictly below, air at
        // and above.
        assert!(sampler.density(0, 63, 0) > 0.0);
        assert!(sampler.density(0, 64, 0) <= 0.0);
        assert!(sampler.density(0, 200, 0) < 0.0);
        assert!(sampler.density(0, -60, 0) > 0.0);
    }

    #[test]
    fn test_density_is_pure() {
        let sampler = sampler(&flat_settings());
        let a = sampler.density(100, 30, -70);
        let b = sampler.density(100, 30, -70);
        assert!((a - b).abs() < 1e-15);
    }

    #[test]
    fn test_monotone_decreasing_in_y_without_noise() {
        let sampler = sampler(&flat_settings());
        let mut prev = f64::INFINITY;
        for y in (-64..320).step_by(8) {
            let d = sampler.density(5, y, 5);
            assert!(d <= prev, "density should not increase with y at {y}");
            prev = d;
        }
    }

    #[test]
    fn test_slides_pull_to_target() {
        let mut settings = flat_settings();
        settings.top_slide = Slide {
            target: -10.0,
            from_y: 200,
            to_y: 300,
        };
        let slid = sampler(&settings);
        let plain = sampler(&flat_settings());
        // Fully slid above to_y.
        assert!((slid.density(0, 310, 0) + 10.0).abs() < 1e-9);
        // Untouched below from_y.
        assert!((slid.density(0, 100, 0) - plain.density(0, 100, 0)).abs() < 1e-12);
    }
}

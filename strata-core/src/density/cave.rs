//! Noise cave carving: cheese rooms, layered cracks, spaghetti tunnels,
//! entrances, and pillars, composed with min/max/threshold rules.

use strata_utils::math::{clamped_map, map, square};
use strata_utils::noise::DoublePerlinNoise;
use strata_utils::random::RandomSplitter;

use crate::config::GenerationShape;

/// Base density above which a column is treated as deep underground; below
/// it only the entrance tunnels carve.
const SURFACE_BRANCH_THRESHOLD: f64 = 1.5625;
/// Entrance tunnels are widened by this factor near the surface.
const ENTRANCE_SCALE: f64 = 5.0;
/// Offset keeping most cheese density solid.
const CHEESE_OFFSET: f64 = 0.27;
/// Y scale of the cheese noise.
const CHEESE_Y_SCALE: f64 = 0.666_666_666_666_666_6;
/// Y scale of the layer noise.
const LAYER_Y_SCALE: f64 = 8.0;
/// Weight of the squared layer noise.
const LAYER_WEIGHT: f64 = 4.0;
/// Entrance bias and its near-surface gradient.
const ENTRANCE_OFFSET: f64 = 0.37;
const ENTRANCE_GRADIENT_FROM_Y: f64 = -10.0;
const ENTRANCE_GRADIENT_TO_Y: f64 = 30.0;
const ENTRANCE_GRADIENT_FROM: f64 = 0.3;
const ENTRANCE_GRADIENT_TO: f64 = 0.0;
/// Spaghetti-3d thickness band.
const SPAGHETTI_3D_THICKNESS_MIN: f64 = -0.065;
const SPAGHETTI_3D_THICKNESS_MAX: f64 = -0.088;
/// Spaghetti-2d thickness band and its contribution to the tunnel floor.
const SPAGHETTI_2D_THICKNESS_MIN: f64 = -0.6;
const SPAGHETTI_2D_THICKNESS_MAX: f64 = -1.3;
const SPAGHETTI_2D_THICKNESS_WEIGHT: f64 = 0.083;
/// Elevation gradient of the 2d tunnels, in 8-block bands.
const SPAGHETTI_2D_BAND_BLOCKS: f64 = 8.0;
/// Roughness band.
const ROUGHNESS_MODULATOR_MAX: f64 = -0.1;
const ROUGHNESS_OFFSET: f64 = -0.4;
/// Pillars survive only above this raw pillar density.
const PILLAR_CUTOFF: f64 = 0.03;
/// Horizontal and vertical scale of the pillar noise.
const PILLAR_XZ_SCALE: f64 = 25.0;
const PILLAR_Y_SCALE: f64 = 0.3;
const PILLAR_RARENESS_MAX: f64 = -2.0;
const PILLAR_THICKNESS_MAX: f64 = 1.1;
/// Marker for "no pillar here"; far below any reachable density.
const NO_PILLAR: f64 = -1.0e6;
/// Rarity-modulated spaghetti sampling scale (xz and y).
const SPAGHETTI_MODULATOR_XZ_SCALE: f64 = 2.0;

/// Thickness/rarity modulation for the spaghetti noises.
///
/// Maps a slowly varying modulator noise onto a discrete tunnel radius; the
/// shaped noise is then sampled at coordinates divided by that radius and
/// rescaled by it, so rare tunnels are wide and common ones narrow.
#[derive(Debug, Clone, Copy)]
pub enum RarityMapper {
    /// 3-d tunnels: radii 0.75–2.0.
    Tunnels,
    /// 2-d tunnels: radii 0.5–3.0.
    Caves,
}

impl RarityMapper {
    /// Discrete radius for a modulator value.
    #[inline]
    #[must_use]
    pub fn rarity(&self, value: f64) -> f64 {
        match self {
            Self::Tunnels => {
                if value < -0.5 {
                    0.75
                } else if value < 0.0 {
                    1.0
                } else if value < 0.5 {
                    1.5
                } else {
                    2.0
                }
            }
            Self::Caves => {
                if value < -0.75 {
                    0.5
                } else if value < -0.5 {
                    0.75
                } else if value < 0.5 {
                    1.0
                } else if value < 0.75 {
                    2.0
                } else {
                    3.0
                }
            }
        }
    }
}

/// The cave noise set and its composition.
///
/// Pure: `apply(base, x, y, z)` never mutates, so carving is re-entrant
/// across interpolator corner fills.
pub struct CaveComposer {
    cheese: DoublePerlinNoise,
    layer: DoublePerlinNoise,
    entrance: DoublePerlinNoise,
    pillar: DoublePerlinNoise,
    pillar_rareness: DoublePerlinNoise,
    pillar_thickness: DoublePerlinNoise,
    spaghetti_2d: DoublePerlinNoise,
    spaghetti_2d_modulator: DoublePerlinNoise,
    spaghetti_2d_elevation: DoublePerlinNoise,
    spaghetti_2d_thickness: DoublePerlinNoise,
    spaghetti_3d_1: DoublePerlinNoise,
    spaghetti_3d_2: DoublePerlinNoise,
    spaghetti_3d_rarity: DoublePerlinNoise,
    spaghetti_3d_thickness: DoublePerlinNoise,
    roughness: DoublePerlinNoise,
    roughness_modulator: DoublePerlinNoise,
    min_y: i32,
    max_y: i32,
}

impl CaveComposer {
    /// Builds the cave noise set from the world splitter.
    #[must_use]
    pub fn new(splitter: &RandomSplitter, shape: &GenerationShape) -> Self {
        Self {
            cheese: DoublePerlinNoise::create(
                splitter,
                "cave_cheese",
                -8,
                &[0.5, 1.0, 2.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            ),
            layer: DoublePerlinNoise::create(splitter, "cave_layer", -8, &[1.0]),
            entrance: DoublePerlinNoise::create(splitter, "cave_entrance", -7, &[0.4, 0.5, 1.0]),
            pillar: DoublePerlinNoise::create(splitter, "pillar", -7, &[1.0, 1.0]),
            pillar_rareness: DoublePerlinNoise::create(splitter, "pillar_rareness", -8, &[1.0]),
            pillar_thickness: DoublePerlinNoise::create(splitter, "pillar_thickness", -8, &[1.0]),
            spaghetti_2d: DoublePerlinNoise::create(splitter, "spaghetti_2d", -7, &[1.0]),
            spaghetti_2d_modulator: DoublePerlinNoise::create(
                splitter,
                "spaghetti_2d_modulator",
                -11,
                &[1.0],
            ),
            spaghetti_2d_elevation: DoublePerlinNoise::create(
                splitter,
                "spaghetti_2d_elevation",
                -8,
                &[1.0],
            ),
            spaghetti_2d_thickness: DoublePerlinNoise::create(
                splitter,
                "spaghetti_2d_thickness",
                -11,
                &[1.0],
            ),
            spaghetti_3d_1: DoublePerlinNoise::create(splitter, "spaghetti_3d_1", -7, &[1.0]),
            spaghetti_3d_2: DoublePerlinNoise::create(splitter, "spaghetti_3d_2", -7, &[1.0]),
            spaghetti_3d_rarity: DoublePerlinNoise::create(
                splitter,
                "spaghetti_3d_rarity",
                -11,
                &[1.0],
            ),
            spaghetti_3d_thickness: DoublePerlinNoise::create(
                splitter,
                "spaghetti_3d_thickness",
                -8,
                &[1.0],
            ),
            roughness: DoublePerlinNoise::create(splitter, "spaghetti_roughness", -5, &[1.0]),
            roughness_modulator: DoublePerlinNoise::create(
                splitter,
                "spaghetti_roughness_modulator",
                -8,
                &[1.0],
            ),
            min_y: shape.min_y,
            max_y: shape.max_y(),
        }
    }

    /// Carves the base density.
    ///
    /// Branches on whether the uncarved density reads as deep underground
    /// (above [`SURFACE_BRANCH_THRESHOLD`]): near the surface only widened
    /// entrance tunnels apply; at depth the full room/tunnel/pillar
    /// composition takes over.
    #[must_use]
    pub fn apply(&self, base: f64, x: i32, y: i32, z: i32) -> f64 {
        if base < SURFACE_BRANCH_THRESHOLD {
            base.min(ENTRANCE_SCALE * self.entrances(x, y, z))
        } else {
            self.underground(base, x, y, z)
        }
    }

    fn underground(&self, base: f64, x: i32, y: i32, z: i32) -> f64 {
        let (xf, yf, zf) = (f64::from(x), f64::from(y), f64::from(z));

        let layered = LAYER_WEIGHT * square(self.layer.sample(xf, yf * LAYER_Y_SCALE, zf));
        let cheese = self.cheese.sample(xf, yf * CHEESE_Y_SCALE, zf);
        let rooms = (CHEESE_OFFSET + cheese).clamp(-1.0, 1.0)
            + (1.5 - 0.64 * base).clamp(0.0, 0.5);

        let tunnels = self.spaghetti_2d(x, y, z) + self.roughness(x, y, z);
        let carved = (rooms + layered)
            .min(self.entrances(x, y, z))
            .min(tunnels);

        carved.max(self.pillars(x, y, z))
    }

    /// Near-surface entrance tunnels: two rarity-modulated 3-d spaghetti
    /// noises against a broad entrance noise with a shallow-depth gradient.
    fn entrances(&self, x: i32, y: i32, z: i32) -> f64 {
        let (xf, yf, zf) = (f64::from(x), f64::from(y), f64::from(z));

        let rarity = self.spaghetti_3d_rarity.sample(
            xf * SPAGHETTI_MODULATOR_XZ_SCALE,
            yf,
            zf * SPAGHETTI_MODULATOR_XZ_SCALE,
        );
        let thickness = map(
            self.spaghetti_3d_thickness.sample(xf, yf, zf),
            -1.0,
            1.0,
            SPAGHETTI_3D_THICKNESS_MIN,
            SPAGHETTI_3D_THICKNESS_MAX,
        );

        let tunnel_1 = weird_scaled(&self.spaghetti_3d_1, RarityMapper::Tunnels, rarity, xf, yf, zf);
        let tunnel_2 = weird_scaled(&self.spaghetti_3d_2, RarityMapper::Tunnels, rarity, xf, yf, zf);
        let spaghetti = (tunnel_1.max(tunnel_2) + thickness).clamp(-1.0, 1.0);

        let entrance = self.entrance.sample(xf * 0.75, yf * 0.5, zf * 0.75)
            + ENTRANCE_OFFSET
            + clamped_map(
                yf,
                ENTRANCE_GRADIENT_FROM_Y,
                ENTRANCE_GRADIENT_TO_Y,
                ENTRANCE_GRADIENT_FROM,
                ENTRANCE_GRADIENT_TO,
            );

        entrance.min(self.roughness(x, y, z) + spaghetti)
    }

    /// Horizontal worm tunnels pinned to noise-chosen elevation bands.
    fn spaghetti_2d(&self, x: i32, y: i32, z: i32) -> f64 {
        let (xf, yf, zf) = (f64::from(x), f64::from(y), f64::from(z));

        let modulator = self.spaghetti_2d_modulator.sample(
            xf * SPAGHETTI_MODULATOR_XZ_SCALE,
            yf,
            zf * SPAGHETTI_MODULATOR_XZ_SCALE,
        );
        let tunnel = weird_scaled(&self.spaghetti_2d, RarityMapper::Caves, modulator, xf, yf, zf);

        let thickness = map(
            self.spaghetti_2d_thickness.sample(
                xf * SPAGHETTI_MODULATOR_XZ_SCALE,
                yf,
                zf * SPAGHETTI_MODULATOR_XZ_SCALE,
            ),
            -1.0,
            1.0,
            SPAGHETTI_2D_THICKNESS_MIN,
            SPAGHETTI_2D_THICKNESS_MAX,
        );

        // The elevation noise picks an 8-block band; distance from that
        // band closes the tunnel off.
        let min_band = f64::from(strata_utils::math::floor_div(self.min_y, 8));
        let elevation = map(
            self.spaghetti_2d_elevation.sample(xf, 0.0, zf),
            -1.0,
            1.0,
            min_band,
            SPAGHETTI_2D_BAND_BLOCKS,
        );
        let band_gradient = clamped_map(
            yf,
            f64::from(self.min_y),
            f64::from(self.max_y),
            SPAGHETTI_2D_BAND_BLOCKS,
            -40.0,
        );
        let band_distance = (elevation + band_gradient).abs();
        let floor = (band_distance + thickness).powi(3);

        let profile = tunnel + SPAGHETTI_2D_THICKNESS_WEIGHT * thickness;
        profile.max(floor).clamp(-1.0, 1.0)
    }

    /// Shared roughness term jittering tunnel walls.
    fn roughness(&self, x: i32, y: i32, z: i32) -> f64 {
        let (xf, yf, zf) = (f64::from(x), f64::from(y), f64::from(z));
        let modulator = map(
            self.roughness_modulator.sample(xf, yf, zf),
            -1.0,
            1.0,
            0.0,
            ROUGHNESS_MODULATOR_MAX,
        );
        modulator * (self.roughness.sample(xf, yf, zf).abs() + ROUGHNESS_OFFSET)
    }

    /// Rare solid pillars pushed back into carved rooms.
    fn pillars(&self, x: i32, y: i32, z: i32) -> f64 {
        let (xf, yf, zf) = (f64::from(x), f64::from(y), f64::from(z));

        let body = self
            .pillar
            .sample(xf * PILLAR_XZ_SCALE, yf * PILLAR_Y_SCALE, zf * PILLAR_XZ_SCALE);
        let rareness = map(
            self.pillar_rareness.sample(xf, yf, zf),
            -1.0,
            1.0,
            0.0,
            PILLAR_RARENESS_MAX,
        );
        let thickness = map(
            self.pillar_thickness.sample(xf, yf, zf),
            -1.0,
            1.0,
            0.0,
            PILLAR_THICKNESS_MAX,
        );

        let pillar = (body * 2.0 + rareness) * thickness.powi(3);
        if pillar < PILLAR_CUTOFF { NO_PILLAR } else { pillar }
    }
}

/// Samples `noise` at coordinates shrunk by the mapped rarity and rescales
/// the magnitude by it, producing tunnels whose width follows the rarity.
fn weird_scaled(
    noise: &DoublePerlinNoise,
    mapper: RarityMapper,
    rarity_value: f64,
    x: f64,
    y: f64,
    z: f64,
) -> f64 {
    let rarity = mapper.rarity(rarity_value);
    rarity * noise.sample(x / rarity, y / rarity, z / rarity).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_utils::random::{Random, Xoroshiro};

    fn composer() -> CaveComposer {
        let mut rng = Xoroshiro::from_seed(12345);
        let splitter = rng.next_positional();
        CaveComposer::new(&splitter, &GenerationShape::overworld())
    }

    #[test]
    fn test_apply_is_pure() {
        let caves = composer();
        let a = caves.apply(2.0, 37, -20, -105);
        let b = caves.apply(2.0, 37, -20, -105);
        assert!((a - b).abs() < 1e-15);
    }

    #[test]
    fn test_apply_never_raises_near_surface() {
        // Below the branch threshold the result is min(base, tunnels).
        let caves = composer();
        for i in 0..50 {
            let base = 1.0;
            let carved = caves.apply(base, i * 7, 60, i * -13);
            assert!(carved <= base + 1e-12);
        }
    }

    #[test]
    fn test_underground_carves_somewhere() {
        let caves = composer();
        let base = 2.0;
        let mut carved_below = 0usize;
        for x in 0..40 {
            for z in 0..40 {
                let carved = caves.apply(base, x * 16, -32, z * 16);
                if carved < base {
                    carved_below += 1;
                }
            }
        }
        assert!(carved_below > 0, "deep composition should carve something");
    }

    #[test]
    fn test_rarity_mapper_bands() {
        assert!((RarityMapper::Tunnels.rarity(-0.9) - 0.75).abs() < 1e-12);
        assert!((RarityMapper::Tunnels.rarity(0.9) - 2.0).abs() < 1e-12);
        assert!((RarityMapper::Caves.rarity(-0.9) - 0.5).abs() < 1e-12);
        assert!((RarityMapper::Caves.rarity(0.9) - 3.0).abs() < 1e-12);
        assert!((RarityMapper::Caves.rarity(0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pillar_gate() {
        // The pillar branch is either a real pillar density or the marker,
        // never a small positive residue below the cutoff.
        let caves = composer();
        for i in 0..200 {
            let p = caves.pillars(i * 11, -40, i * -7);
            assert!(p >= PILLAR_CUTOFF || p == NO_PILLAR);
        }
    }
}

//! Large ore veins, resolved independently of the density field.

use strata_utils::math::clamped_map;
use strata_utils::noise::DoublePerlinNoise;
use strata_utils::random::{PositionalRandom, Random, RandomSplitter};

use crate::config::VeinFamily;
use crate::material::MaterialId;

/// Veininess magnitude required for vein membership.
const VEIN_MEMBERSHIP: f64 = 0.4;
/// Blocks over which veins fade near their family's Y bounds.
const BOUNDARY_FADE_BLOCKS: f64 = 20.0;
/// Fade penalty at the exact boundary.
const BOUNDARY_FADE_MIN: f64 = -0.2;
/// Fraction of candidate cells skipped outright.
const SKIP_CHANCE: f32 = 0.7;
/// Ridge sum must sit below zero for ore.
const RIDGE_OFFSET: f64 = -0.08;
/// Veininess range mapped onto the ore chance.
const ORE_CHANCE_MIN: f64 = 0.1;
const ORE_CHANCE_MAX: f64 = 0.3;
/// Gap noise above this keeps the cell mineral-bearing.
const GAP_CUTOFF: f64 = -0.3;
/// Chance that a placed ore upgrades to the raw-ore block.
const RAW_ORE_CHANCE: f32 = 0.02;
/// Sampling scales.
const VEININESS_SCALE: f64 = 1.5;
const RIDGE_SCALE: f64 = 4.0;

/// The vein noise set, built once per world.
pub struct OreVeinNoises {
    veininess: DoublePerlinNoise,
    ridge_a: DoublePerlinNoise,
    ridge_b: DoublePerlinNoise,
    gap: DoublePerlinNoise,
}

impl OreVeinNoises {
    /// Builds the vein noises from the world splitter.
    #[must_use]
    pub fn new(splitter: &RandomSplitter) -> Self {
        Self {
            veininess: DoublePerlinNoise::create(splitter, "ore_veininess", -8, &[1.0]),
            ridge_a: DoublePerlinNoise::create(splitter, "ore_vein_a", -7, &[1.0]),
            ridge_b: DoublePerlinNoise::create(splitter, "ore_vein_b", -7, &[1.0]),
            gap: DoublePerlinNoise::create(splitter, "ore_gap", -5, &[1.0]),
        }
    }
}

/// Per-chunk vein sampler.
pub struct OreVeinSampler<'a> {
    noises: &'a OreVeinNoises,
    splitter: RandomSplitter,
    shallow: &'a VeinFamily,
    deep: &'a VeinFamily,
}

impl<'a> OreVeinSampler<'a> {
    /// Creates a sampler over the two configured families.
    #[must_use]
    pub fn new(
        noises: &'a OreVeinNoises,
        splitter: RandomSplitter,
        shallow: &'a VeinFamily,
        deep: &'a VeinFamily,
    ) -> Self {
        Self {
            noises,
            splitter,
            shallow,
            deep,
        }
    }

    /// Samples the vein at a position.
    ///
    /// `Some` replaces the would-be solid block with ore, the rare raw-ore
    /// block, or the family's filler stone; `None` leaves the base stone.
    #[must_use]
    pub fn sample(&self, x: i32, y: i32, z: i32) -> Option<MaterialId> {
        let veininess = self.noises.veininess.sample(
            f64::from(x) * VEININESS_SCALE,
            f64::from(y) * VEININESS_SCALE,
            f64::from(z) * VEININESS_SCALE,
        );

        // Sign picks the family, magnitude the vein body.
        let family = if veininess > 0.0 {
            self.shallow
        } else {
            self.deep
        };

        if y < family.min_y || y > family.max_y {
            return None;
        }

        let dist_to_min = f64::from(y - family.min_y);
        let dist_to_max = f64::from(family.max_y - y);
        let boundary_fade = clamped_map(
            dist_to_min.min(dist_to_max),
            0.0,
            BOUNDARY_FADE_BLOCKS,
            BOUNDARY_FADE_MIN,
            0.0,
        );

        let magnitude = veininess.abs();
        if magnitude + boundary_fade < VEIN_MEMBERSHIP {
            return None;
        }

        let mut random = self.splitter.at(x, y, z);
        if random.next_f32() > SKIP_CHANCE {
            return None;
        }

        let ridged = RIDGE_OFFSET
            + self
                .noises
                .ridge_a
                .sample(
                    f64::from(x) * RIDGE_SCALE,
                    f64::from(y) * RIDGE_SCALE,
                    f64::from(z) * RIDGE_SCALE,
                )
                .abs()
                .max(
                    self.noises
                        .ridge_b
                        .sample(
                            f64::from(x) * RIDGE_SCALE,
                            f64::from(y) * RIDGE_SCALE,
                            f64::from(z) * RIDGE_SCALE,
                        )
                        .abs(),
                );
        if ridged >= 0.0 {
            return None;
        }

        let ore_chance = clamped_map(
            magnitude,
            VEIN_MEMBERSHIP,
            0.6,
            ORE_CHANCE_MIN,
            ORE_CHANCE_MAX,
        ) as f32;

        if random.next_f32() < ore_chance
            && self
                .noises
                .gap
                .sample(f64::from(x), f64::from(y), f64::from(z))
                > GAP_CUTOFF
        {
            return if random.next_f32() < RAW_ORE_CHANCE {
                Some(family.raw_ore)
            } else if y < 0 {
                Some(family.deep_ore)
            } else {
                Some(family.ore)
            };
        }

        Some(family.filler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_utils::random::Xoroshiro;

    fn families() -> (VeinFamily, VeinFamily) {
        (
            VeinFamily {
                ore: MaterialId(10),
                deep_ore: MaterialId(11),
                raw_ore: MaterialId(12),
                filler: MaterialId(13),
                min_y: 0,
                max_y: 50,
            },
            VeinFamily {
                ore: MaterialId(20),
                deep_ore: MaterialId(21),
                raw_ore: MaterialId(22),
                filler: MaterialId(23),
                min_y: -60,
                max_y: -8,
            },
        )
    }

    fn noises() -> OreVeinNoises {
        let mut rng = Xoroshiro::from_seed(12345);
        let splitter = rng.next_positional();
        OreVeinNoises::new(&splitter)
    }

    #[test]
    fn test_no_vein_outside_family_ranges() {
        let noises = noises();
        let mut rng = Xoroshiro::from_seed(777);
        let splitter = rng.next_positional();
        let (shallow, deep) = families();
        let sampler = OreVeinSampler::new(&noises, splitter, &shallow, &deep);

        // Y values outside both families can never produce a vein block.
        for y in [-64, -62, 51, 100, 200] {
            for x in 0..64 {
                for z in 0..8 {
                    assert_eq!(sampler.sample(x * 7, y, z * 13), None);
                }
            }
        }
    }

    #[test]
    fn test_determinism() {
        let noises = noises();
        let mut rng = Xoroshiro::from_seed(777);
        let splitter = rng.next_positional();
        let (shallow, deep) = families();
        let sampler = OreVeinSampler::new(&noises, splitter, &shallow, &deep);

        for x in 0..32 {
            for y in -60..-40 {
                let a = sampler.sample(x * 3, y, -x * 5);
                let b = sampler.sample(x * 3, y, -x * 5);
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_vein_blocks_belong_to_one_family() {
        let noises = noises();
        let mut rng = Xoroshiro::from_seed(777);
        let splitter = rng.next_positional();
        let (shallow, deep) = families();
        let sampler = OreVeinSampler::new(&noises, splitter, &shallow, &deep);

        let shallow_set = [shallow.ore, shallow.deep_ore, shallow.raw_ore, shallow.filler];
        let deep_set = [deep.ore, deep.deep_ore, deep.raw_ore, deep.filler];

        let mut found = 0usize;
        for x in 0..400 {
            for y in (-60..50).step_by(3) {
                if let Some(material) = sampler.sample(x * 9, y, x * -4) {
                    found += 1;
                    let in_shallow = shallow_set.contains(&material);
                    let in_deep = deep_set.contains(&material);
                    assert!(in_shallow ^ in_deep, "vein material from exactly one family");
                    if in_shallow {
                        assert!((shallow.min_y..=shallow.max_y).contains(&y));
                    } else {
                        assert!((deep.min_y..=deep.max_y).contains(&y));
                    }
                }
            }
        }
        assert!(found > 0, "some vein blocks should appear over a large area");
    }
}

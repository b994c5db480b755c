//! Main terrain noise: two 16-octave stacks blended by an 8-octave selector.

use crate::math::clamped_lerp;
use crate::noise::PerlinNoise;
use crate::random::RandomSource;

const LOWER_UPPER_FIRST_OCTAVE: i32 = -15;
const SELECTOR_FIRST_OCTAVE: i32 = -7;

/// The terrain body noise.
///
/// The selector picks, per position, a blend between the lower and upper
/// stacks; because the selector varies slowly, large coherent regions lean
/// toward one stack, which is what gives terrain its banded, non-repeating
/// character. Input coordinates are pre-scaled by configurable horizontal
/// and vertical factors.
#[derive(Debug, Clone)]
pub struct BlendedNoise {
    lower: PerlinNoise,
    upper: PerlinNoise,
    selector: PerlinNoise,
    xz_multiplier: f64,
    y_multiplier: f64,
    xz_factor: f64,
    y_factor: f64,
    smear_scale_multiplier: f64,
}

impl BlendedNoise {
    /// Base input multiplier scaled by the configured xz/y scale.
    const BASE_MULTIPLIER: f64 = 684.412;

    /// Creates the three stacks from a sequential source, in order:
    /// lower, upper, selector.
    #[must_use]
    pub fn new(
        random: &mut RandomSource,
        xz_scale: f64,
        y_scale: f64,
        xz_factor: f64,
        y_factor: f64,
        smear_scale_multiplier: f64,
    ) -> Self {
        let body_amplitudes = vec![1.0; 16];
        let selector_amplitudes = vec![1.0; 8];

        let lower =
            PerlinNoise::create_from_random(random, LOWER_UPPER_FIRST_OCTAVE, &body_amplitudes);
        let upper =
            PerlinNoise::create_from_random(random, LOWER_UPPER_FIRST_OCTAVE, &body_amplitudes);
        let selector =
            PerlinNoise::create_from_random(random, SELECTOR_FIRST_OCTAVE, &selector_amplitudes);

        Self {
            lower,
            upper,
            selector,
            xz_multiplier: Self::BASE_MULTIPLIER * xz_scale,
            y_multiplier: Self::BASE_MULTIPLIER * y_scale,
            xz_factor,
            y_factor,
            smear_scale_multiplier,
        }
    }

    /// Samples the blended noise at a block position.
    #[must_use]
    pub fn compute(&self, x: i32, y: i32, z: i32) -> f64 {
        let scaled_x = f64::from(x) * self.xz_multiplier;
        let scaled_y = f64::from(y) * self.y_multiplier;
        let scaled_z = f64::from(z) * self.xz_multiplier;

        let select_x = scaled_x / self.xz_factor;
        let select_y = scaled_y / self.y_factor;
        let select_z = scaled_z / self.xz_factor;

        let smear = self.y_multiplier * self.smear_scale_multiplier;
        let select_smear = smear / self.y_factor;

        let selector_value =
            self.selector
                .get_value_smeared(select_x, select_y, select_z, select_smear, select_y);
        let blend = f64::midpoint(selector_value / 10.0, 1.0);

        let lower_value = if blend >= 1.0 {
            0.0
        } else {
            self.lower
                .get_value_smeared(scaled_x, scaled_y, scaled_z, smear, scaled_y)
        };
        let upper_value = if blend <= 0.0 {
            0.0
        } else {
            self.upper
                .get_value_smeared(scaled_x, scaled_y, scaled_z, smear, scaled_y)
        };

        clamped_lerp(lower_value / 512.0, upper_value / 512.0, blend) / 128.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{Random, Xoroshiro};

    fn make(seed: u64) -> BlendedNoise {
        let mut rng = Xoroshiro::from_seed(seed);
        BlendedNoise::new(&mut rng, 0.25, 0.125, 80.0, 160.0, 8.0)
    }

    #[test]
    fn test_deterministic() {
        let a = make(12345);
        let b = make(12345);
        for i in 0..20 {
            let (x, y, z) = (i * 17, 64 - i, i * -13);
            assert!((a.compute(x, y, z) - b.compute(x, y, z)).abs() < 1e-15);
        }
    }

    #[test]
    fn test_seed_sensitivity() {
        let a = make(12345);
        let b = make(54321);
        let same = (0..16)
            .filter(|&i| {
                let (x, y, z) = (i * 31, 40, i * 7);
                (a.compute(x, y, z) - b.compute(x, y, z)).abs() < 1e-12
            })
            .count();
        assert!(same < 4, "different seeds should decorrelate the body noise");
    }

    #[test]
    fn test_output_bounded() {
        let noise = make(42);
        for i in -20..20 {
            let v = noise.compute(i * 9, i, i * -5);
            // Each body stack divides by 512 then 128; values stay small.
            assert!(v.abs() < 1.0, "unexpected magnitude {v}");
        }
    }
}

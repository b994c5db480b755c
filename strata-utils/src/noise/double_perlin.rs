//! Double perlin noise: two offset octave stacks summed and normalized.

use crate::noise::PerlinNoise;
use crate::random::{PositionalRandom, RandomSource, RandomSplitter};

/// Input factor for the second stack. Slightly off from 1 so the two stacks
/// never phase-lock.
#[allow(clippy::unreadable_literal)]
pub const INPUT_FACTOR: f64 = 1.0181268882175227;

/// Target standard deviation of the normalized output (1/6).
#[allow(clippy::unreadable_literal)]
const TARGET_DEVIATION: f64 = 0.16666666666666666;

/// Two-stack noise generator.
///
/// Every named noise in the pipeline (barrier, floodedness, veininess, the
/// surface noises) is one of these. The second stack samples at coordinates
/// scaled by [`INPUT_FACTOR`]; the sum is rescaled so the amplitude layout
/// does not change the output's overall deviation.
#[derive(Debug, Clone)]
pub struct DoublePerlinNoise {
    first: PerlinNoise,
    second: PerlinNoise,
    value_factor: f64,
    max_value: f64,
}

impl DoublePerlinNoise {
    /// Creates the two stacks from a sequential source, in order.
    #[must_use]
    pub fn create_from_random(
        random: &mut RandomSource,
        first_octave: i32,
        amplitudes: &[f64],
    ) -> Self {
        let first = PerlinNoise::create_from_random(random, first_octave, amplitudes);
        let second = PerlinNoise::create_from_random(random, first_octave, amplitudes);

        Self::finish(first, second, amplitudes)
    }

    /// Creates a named noise from a positional splitter.
    #[must_use]
    pub fn create(
        splitter: &RandomSplitter,
        noise_id: &str,
        first_octave: i32,
        amplitudes: &[f64],
    ) -> Self {
        let mut random = splitter.with_hash_of(noise_id);
        Self::create_from_random(&mut random, first_octave, amplitudes)
    }

    fn finish(first: PerlinNoise, second: PerlinNoise, amplitudes: &[f64]) -> Self {
        let mut min_octave = i32::MAX;
        let mut max_octave = i32::MIN;
        for (i, &amp) in amplitudes.iter().enumerate() {
            if amp != 0.0 {
                min_octave = min_octave.min(i as i32);
                max_octave = max_octave.max(i as i32);
            }
        }

        let octave_span = max_octave - min_octave;
        let value_factor = TARGET_DEVIATION / expected_deviation(octave_span);
        let max_value = (first.max_value() + second.max_value()) * value_factor;

        Self {
            first,
            second,
            value_factor,
            max_value,
        }
    }

    /// Samples the noise at the given coordinates.
    #[inline]
    #[must_use]
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let x2 = x * INPUT_FACTOR;
        let y2 = y * INPUT_FACTOR;
        let z2 = z * INPUT_FACTOR;
        (self.first.get_value(x, y, z) + self.second.get_value(x2, y2, z2)) * self.value_factor
    }

    /// Largest possible output magnitude.
    #[inline]
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }
}

/// Expected deviation of the summed stacks for a given octave span:
/// `0.1 * (1 + 1/(span + 1))`.
#[inline]
fn expected_deviation(octave_span: i32) -> f64 {
    0.1 * (1.0 + 1.0 / f64::from(octave_span + 1))
}

#[cfg(test)]
#[allow(clippy::unreadable_literal)]
mod tests {
    use super::*;
    use crate::random::{Random, Xoroshiro};

    #[test]
    fn test_deterministic() {
        let mut rng = Xoroshiro::from_seed(12345);
        let splitter = rng.next_positional();

        let amplitudes = [1.0, 1.0, 1.0];
        let noise1 = DoublePerlinNoise::create(&splitter, "test_noise", -3, &amplitudes);
        let noise2 = DoublePerlinNoise::create(&splitter, "test_noise", -3, &amplitudes);

        let v1 = noise1.sample(100.0, 64.0, 100.0);
        let v2 = noise2.sample(100.0, 64.0, 100.0);
        assert!((v1 - v2).abs() < 1e-15);
    }

    #[test]
    fn test_different_ids_decorrelated() {
        let mut rng = Xoroshiro::from_seed(12345);
        let splitter = rng.next_positional();

        let a = DoublePerlinNoise::create(&splitter, "barrier", -3, &[1.0]);
        let b = DoublePerlinNoise::create(&splitter, "spread", -3, &[1.0]);

        let va = a.sample(500.0, 10.0, 500.0);
        let vb = b.sample(500.0, 10.0, 500.0);
        assert!((va - vb).abs() > 1e-9);
    }

    #[test]
    fn test_spatial_variation() {
        let mut rng = Xoroshiro::from_seed(42);
        let splitter = rng.next_positional();

        let noise = DoublePerlinNoise::create(&splitter, "test_noise", -4, &[1.0, 1.0, 1.0, 1.0]);

        let values: Vec<f64> = (0..10)
            .map(|i| noise.sample(f64::from(i) * 50.0, 64.0, f64::from(i) * 50.0))
            .collect();

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(max - min > 0.01);
    }

    #[test]
    fn test_expected_deviation() {
        assert!((expected_deviation(0) - 0.2).abs() < 1e-10);
        assert!((expected_deviation(1) - 0.15).abs() < 1e-10);
        assert!((expected_deviation(2) - 0.13333333333333333).abs() < 1e-10);
    }
}

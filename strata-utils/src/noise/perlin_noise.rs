//! Octave-stacked gradient noise.

use crate::noise::ImprovedNoise;
use crate::random::{PositionalRandom, Random, RandomSource, RandomSplitter};

/// Coordinates are wrapped to this period before sampling to keep f64
/// precision stable far from the origin. 2^25.
const ROUND_OFF: f64 = 33_554_432.0;

/// Octave-based noise generator.
///
/// Combines multiple [`ImprovedNoise`] instances at doubling frequencies and
/// halving amplitudes, giving detail at several scales from one sampler.
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    /// One generator per octave; `None` where the amplitude is 0.
    noise_levels: Vec<Option<ImprovedNoise>>,
    /// Amplitude multiplier per octave.
    amplitudes: Vec<f64>,
    /// Input factor for the lowest-frequency octave.
    lowest_freq_input_factor: f64,
    /// Output factor for the lowest-frequency octave.
    lowest_freq_value_factor: f64,
    /// Largest possible output magnitude.
    max_value: f64,
}

impl PerlinNoise {
    /// Creates a stack seeded per-octave from a positional splitter.
    ///
    /// Octave `i` draws its source from `splitter.with_hash_of("octave_{o}")`
    /// where `o = first_octave + i`, so a stack is fully determined by the
    /// splitter and its octave layout.
    #[must_use]
    pub fn create(splitter: &RandomSplitter, first_octave: i32, amplitudes: &[f64]) -> Self {
        let zero_octave_index = (-first_octave) as usize;
        let mut noise_levels = vec![None; amplitudes.len()];

        for (i, &amplitude) in amplitudes.iter().enumerate() {
            if amplitude != 0.0 {
                let octave = first_octave + i as i32;
                let mut octave_random = splitter.with_hash_of(&format!("octave_{octave}"));
                noise_levels[i] = Some(ImprovedNoise::new(&mut octave_random));
            }
        }

        Self::from_parts(noise_levels, amplitudes, zero_octave_index)
    }

    /// Creates a stack from a sequential source.
    ///
    /// Forks a positional splitter first (consuming two values), so building
    /// two stacks back-to-back from one source yields independent noises.
    /// [`DoublePerlinNoise`](super::DoublePerlinNoise) relies on this.
    #[must_use]
    pub fn create_from_random(
        random: &mut RandomSource,
        first_octave: i32,
        amplitudes: &[f64],
    ) -> Self {
        let splitter = random.next_positional();
        Self::create(&splitter, first_octave, amplitudes)
    }

    fn from_parts(
        noise_levels: Vec<Option<ImprovedNoise>>,
        amplitudes: &[f64],
        zero_octave_index: usize,
    ) -> Self {
        let octaves = amplitudes.len();

        let lowest_freq_input_factor = 2.0_f64.powi(-(zero_octave_index as i32));
        let lowest_freq_value_factor =
            2.0_f64.powi((octaves - 1) as i32) / (2.0_f64.powi(octaves as i32) - 1.0);
        let max_value = Self::edge_value(amplitudes, lowest_freq_value_factor, 2.0);

        Self {
            noise_levels,
            amplitudes: amplitudes.to_vec(),
            lowest_freq_input_factor,
            lowest_freq_value_factor,
            max_value,
        }
    }

    fn edge_value(amplitudes: &[f64], lowest_freq_value_factor: f64, noise_value: f64) -> f64 {
        let mut value = 0.0;
        let mut value_factor = lowest_freq_value_factor;

        for &amplitude in amplitudes {
            if amplitude != 0.0 {
                value += amplitude * noise_value * value_factor;
            }
            value_factor /= 2.0;
        }

        value
    }

    /// Samples the stack at the given coordinates.
    #[inline]
    #[must_use]
    pub fn get_value(&self, x: f64, y: f64, z: f64) -> f64 {
        self.get_value_smeared(x, y, z, 0.0, 0.0)
    }

    /// Samples with vertical smearing parameters forwarded to each octave.
    #[must_use]
    pub fn get_value_smeared(&self, x: f64, y: f64, z: f64, y_scale: f64, y_limit: f64) -> f64 {
        let mut value = 0.0;
        let mut input_factor = self.lowest_freq_input_factor;
        let mut value_factor = self.lowest_freq_value_factor;

        for (i, noise_opt) in self.noise_levels.iter().enumerate() {
            if let Some(noise) = noise_opt {
                let noise_val = noise.noise_smeared(
                    wrap(x * input_factor),
                    wrap(y * input_factor),
                    wrap(z * input_factor),
                    y_scale * input_factor,
                    y_limit * input_factor,
                );
                value += self.amplitudes[i] * noise_val * value_factor;
            }

            input_factor *= 2.0;
            value_factor /= 2.0;
        }

        value
    }

    /// Largest possible output magnitude.
    #[inline]
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }
}

/// Wraps a coordinate into `[-ROUND_OFF/2, ROUND_OFF/2]`.
#[inline]
#[must_use]
fn wrap(x: f64) -> f64 {
    x - (x / ROUND_OFF + 0.5).floor() * ROUND_OFF
}

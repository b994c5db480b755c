//! Depth-based choice between shallow and deep solid material.

use strata_utils::math::clamped_map;
use strata_utils::random::{PositionalRandom, Random, RandomSplitter};

use crate::config::DeepStoneSettings;
use crate::material::MaterialId;

/// Base stone source: always deep below the band, always shallow above it,
/// and a dithered mix inside it.
///
/// The dither draws from position-keyed randomness, not the density noise,
/// so the band is a noisy non-planar surface decoupled from terrain shape.
pub struct BaseStoneSource {
    shallow: MaterialId,
    deep: MaterialId,
    low_y: i32,
    high_y: i32,
    enabled: bool,
    splitter: RandomSplitter,
}

impl BaseStoneSource {
    /// Creates the source; `splitter` should be keyed to the stone-depth
    /// stream of the world seed.
    #[must_use]
    pub fn new(
        settings: &DeepStoneSettings,
        shallow: MaterialId,
        deep: MaterialId,
        splitter: RandomSplitter,
    ) -> Self {
        Self {
            shallow,
            deep,
            low_y: settings.low_y,
            high_y: settings.high_y,
            enabled: settings.enabled,
            splitter,
        }
    }

    /// Probability of deep material at the given y; decreases linearly
    /// across the band.
    fn deep_probability(&self, y: i32) -> f64 {
        clamped_map(
            f64::from(y),
            f64::from(self.low_y),
            f64::from(self.high_y),
            1.0,
            0.0,
        )
    }

    /// The solid material at a position.
    #[must_use]
    pub fn material(&self, x: i32, y: i32, z: i32) -> MaterialId {
        if !self.enabled || y >= self.high_y {
            return self.shallow;
        }
        if y < self.low_y {
            return self.deep;
        }
        let mut random = self.splitter.at(x, y, z);
        if f64::from(random.next_f32()) < self.deep_probability(y) {
            self.deep
        } else {
            self.shallow
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_utils::random::Xoroshiro;

    const SHALLOW: MaterialId = MaterialId(1);
    const DEEP: MaterialId = MaterialId(2);

    fn source(enabled: bool) -> BaseStoneSource {
        let mut rng = Xoroshiro::from_seed(12345);
        let splitter = rng.next_positional();
        BaseStoneSource::new(
            &DeepStoneSettings {
                enabled,
                low_y: 0,
                high_y: 8,
            },
            SHALLOW,
            DEEP,
            splitter,
        )
    }

    #[test]
    fn test_always_deep_below_band() {
        let stone = source(true);
        for x in 0..32 {
            assert_eq!(stone.material(x, -1, x), DEEP);
            assert_eq!(stone.material(x, -60, -x), DEEP);
        }
    }

    #[test]
    fn test_always_shallow_above_band() {
        let stone = source(true);
        for x in 0..32 {
            assert_eq!(stone.material(x, 8, x), SHALLOW);
            assert_eq!(stone.material(x, 100, -x), SHALLOW);
        }
    }

    #[test]
    fn test_band_probability_monotone() {
        let stone = source(true);
        let mut prev = f64::INFINITY;
        for y in 0..=8 {
            let p = stone.deep_probability(y);
            assert!(p <= prev, "deep probability must not increase with y");
            prev = p;
        }
        assert!((stone.deep_probability(0) - 1.0).abs() < 1e-12);
        assert!(stone.deep_probability(8).abs() < 1e-12);
    }

    #[test]
    fn test_band_is_mixed_and_deterministic() {
        let stone = source(true);
        let mut deep_count = 0usize;
        for x in 0..64 {
            for z in 0..64 {
                let a = stone.material(x, 4, z);
                let b = stone.material(x, 4, z);
                assert_eq!(a, b, "dither must be position-deterministic");
                if a == DEEP {
                    deep_count += 1;
                }
            }
        }
        // Mid-band sits near 50/50; either extreme means the dither is broken.
        assert!(deep_count > 64 * 64 / 8);
        assert!(deep_count < 64 * 64 * 7 / 8);
    }

    #[test]
    fn test_disabled_always_shallow() {
        let stone = source(false);
        for y in [-60, -1, 0, 4, 8, 100] {
            assert_eq!(stone.material(7, y, -3), SHALLOW);
        }
    }
}

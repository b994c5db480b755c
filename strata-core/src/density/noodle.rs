//! Noodle caves: long thin worms clamped into the density after the main
//! cave pass.

use strata_utils::math::map;
use strata_utils::noise::DoublePerlinNoise;
use strata_utils::random::RandomSplitter;

use crate::config::GenerationShape;

/// Ridge noises sample at this scale on every axis.
#[allow(clippy::unreadable_literal)]
const RIDGE_SCALE: f64 = 2.6666666666666665;
/// Weight of the ridge envelope in the tunnel profile.
const RIDGE_WEIGHT: f64 = 1.5;
/// Thickness band the thickness noise maps onto.
const THICKNESS_MIN: f64 = -0.05;
const THICKNESS_MAX: f64 = -0.1;
/// Toggle value used outside the active band (never active).
const TOGGLE_DISABLED: f64 = -1.0;
/// Worms start this many blocks above the world floor.
const BAND_FLOOR_OFFSET: i32 = 4;

/// Worm-cave modifier.
///
/// Where the toggle noise is positive inside the vertical band, the density
/// is clamped to `min(density, thickness + 1.5 * max(|ridge_a|, |ridge_b|))`;
/// the profile dips below zero only where both ridges are near their zero
/// iso-surfaces, which is what draws connected one-to-two-block worms.
/// Outside the band, or when disabled by configuration, the modifier is the
/// identity function.
pub struct NoodleModifier {
    toggle: DoublePerlinNoise,
    thickness: DoublePerlinNoise,
    ridge_a: DoublePerlinNoise,
    ridge_b: DoublePerlinNoise,
    min_y: i32,
    max_y: i32,
    enabled: bool,
}

impl NoodleModifier {
    /// Builds the noodle noise set from the world splitter.
    #[must_use]
    pub fn new(splitter: &RandomSplitter, shape: &GenerationShape, enabled: bool) -> Self {
        Self {
            toggle: DoublePerlinNoise::create(splitter, "noodle", -8, &[1.0]),
            thickness: DoublePerlinNoise::create(splitter, "noodle_thickness", -8, &[1.0]),
            ridge_a: DoublePerlinNoise::create(splitter, "noodle_ridge_a", -7, &[1.0]),
            ridge_b: DoublePerlinNoise::create(splitter, "noodle_ridge_b", -7, &[1.0]),
            min_y: shape.min_y + BAND_FLOOR_OFFSET,
            max_y: shape.max_y(),
            enabled,
        }
    }

    /// Applies the worm profile; identity when disabled or out of band.
    #[must_use]
    pub fn apply(&self, density: f64, x: i32, y: i32, z: i32) -> f64 {
        if !self.enabled {
            return density;
        }

        let toggle = self.banded_sample(&self.toggle, 1.0, TOGGLE_DISABLED, x, y, z);
        if toggle < 0.0 {
            return density;
        }

        let thickness = map(
            self.banded_sample(&self.thickness, 1.0, 0.0, x, y, z),
            -1.0,
            1.0,
            THICKNESS_MIN,
            THICKNESS_MAX,
        );
        let ridge_a = self.banded_sample(&self.ridge_a, RIDGE_SCALE, 0.0, x, y, z);
        let ridge_b = self.banded_sample(&self.ridge_b, RIDGE_SCALE, 0.0, x, y, z);

        let profile = thickness + RIDGE_WEIGHT * ridge_a.abs().max(ridge_b.abs());
        density.min(profile)
    }

    /// Samples a noise inside the vertical band, yielding `out_of_band`
    /// elsewhere.
    fn banded_sample(
        &self,
        noise: &DoublePerlinNoise,
        scale: f64,
        out_of_band: f64,
        x: i32,
        y: i32,
        z: i32,
    ) -> f64 {
        if y < self.min_y || y > self.max_y {
            out_of_band
        } else {
            noise.sample(
                f64::from(x) * scale,
                f64::from(y) * scale,
                f64::from(z) * scale,
            )
        }
    }
}

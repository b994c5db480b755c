//! Density field construction: base sampler, modifiers, interpolation.
//!
//! The density sign convention runs through everything here: positive is
//! solid, non-positive is candidate air/fluid. The chunk filler composes
//! these pieces in a fixed order (sampler, cave, post-process, noodle,
//! beardifier) and only ever evaluates the composition at coarse cell
//! corners; per-block values come from [`CellInterpolator`].

pub mod cave;
pub mod interpolator;
pub mod noodle;
pub mod terrain_sampler;

pub use cave::CaveComposer;
pub use interpolator::CellInterpolator;
pub use noodle::NoodleModifier;
pub use terrain_sampler::TerrainSampler;

/// Final shaping applied after cave composition: rescale, then squeeze into
/// a soft-clamped band so extreme densities cannot dominate interpolation.
#[inline]
#[must_use]
pub fn post_process(density: f64) -> f64 {
    squeeze(density * 0.64)
}

/// Soft clamp: linear near zero, saturating toward ±1/3 + 1/3·…
/// (`c/2 - c³/24` over the clamped input).
#[inline]
#[must_use]
pub fn squeeze(density: f64) -> f64 {
    let clamped = density.clamp(-1.0, 1.0);
    clamped / 2.0 - clamped * clamped * clamped / 24.0
}

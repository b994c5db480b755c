//! Noise tower used by the terrain pipeline.
//!
//! - [`ImprovedNoise`] - single-octave gradient noise
//! - [`PerlinNoise`] - octave stack over [`ImprovedNoise`]
//! - [`DoublePerlinNoise`] - two offset octave stacks, the workhorse for
//!   every named noise in the pipeline
//! - [`BlendedNoise`] - the three-stack main terrain noise

mod blended_noise;
mod double_perlin;
mod improved_noise;
mod perlin_noise;

pub use blended_noise::BlendedNoise;
pub use double_perlin::DoublePerlinNoise;
pub use improved_noise::ImprovedNoise;
pub use perlin_noise::PerlinNoise;

//! Volumetric terrain synthesis for a voxel world.
//!
//! For every cell of a 3-D chunk the pipeline decides what material
//! occupies it — stone, fluid, air, ore, or bedrock — from a continuous
//! density field built from layered noise, refined by cave carving, ore
//! veins, a cellular fluid table, and a rule-based surface pass.
//!
//! The hard requirement running through every module is determinism:
//! identical seed and coordinates always yield identical material,
//! independent of generation order or concurrency.

pub mod aquifer;
pub mod beardifier;
pub mod biome;
pub mod chunk;
pub mod config;
pub mod density;
pub mod filler;
pub mod fluid;
pub mod generator;
pub mod material;
pub mod ore;
pub mod stone;
pub mod surface;
pub mod surface_height;

pub use config::{GeneratorSettings, SettingsError};
pub use generator::TerrainGenerator;
pub use material::{MaterialId, Materials};

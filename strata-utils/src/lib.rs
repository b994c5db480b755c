//! Deterministic primitives for the strata terrain engine.
//!
//! This crate holds everything below worldgen policy: math helpers, the
//! seeded random stack, and the noise tower. Nothing in here knows about
//! chunks, materials, or biomes.

pub mod math;
pub mod noise;
pub mod random;

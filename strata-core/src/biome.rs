//! The biome interface the core consumes.
//!
//! The biome catalog itself (presets, decorations, spawn tables) is an
//! external collaborator; the pipeline reads only a handful of scalars per
//! biome plus flags the surface rules branch on.

use std::sync::Arc;

use strata_utils::math::clamped_map;

/// Index into a [`BiomeCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BiomeId(pub u16);

/// Threshold below which the adjusted temperature freezes water.
const FREEZING_TEMPERATURE: f64 = 0.15;
/// Y above which temperature starts dropping with altitude.
const TEMPERATURE_DROP_START_Y: i32 = 80;
/// Temperature lost per block above the drop start.
const TEMPERATURE_DROP_PER_BLOCK: f64 = 0.00125;

/// The per-biome scalars the terrain core reads.
#[derive(Debug, Clone)]
pub struct Biome {
    /// Terrain anchor offset in depth units.
    pub depth: f64,
    /// Vertical feature stretch.
    pub scale: f64,
    /// Base temperature at low altitude.
    pub temperature: f64,
    /// Whether the depth/scale blend amplifies this biome's contribution.
    pub exaggerated: bool,
    /// Column-shape correction applied before surface rules.
    pub surface_correction: SurfaceCorrection,
}

/// Biome-driven column-shape corrections run by the surface pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceCorrection {
    /// No correction.
    None,
    /// Eroded-badlands pillar extension.
    BadlandsPillars,
    /// Frozen-ocean iceberg and snow extension.
    Icebergs,
}

impl Biome {
    /// Altitude-adjusted temperature at the given Y.
    #[must_use]
    pub fn temperature_at(&self, y: i32) -> f64 {
        if y > TEMPERATURE_DROP_START_Y {
            self.temperature
                - f64::from(y - TEMPERATURE_DROP_START_Y) * TEMPERATURE_DROP_PER_BLOCK
        } else {
            self.temperature
        }
    }

    /// Whether standing water freezes at the given Y in this biome.
    #[must_use]
    pub fn is_freezing_at(&self, y: i32) -> bool {
        self.temperature_at(y) < FREEZING_TEMPERATURE
    }

    /// Relative weight of this biome in the depth/scale blend.
    ///
    /// Exaggerated biomes count double against flatter neighbors, pulling
    /// the blended anchor toward their declared depth.
    #[must_use]
    pub fn blend_amplification(&self) -> f64 {
        if self.exaggerated {
            clamped_map(self.depth, 0.0, 1.0, 1.0, 2.0)
        } else {
            1.0
        }
    }
}

/// Immutable biome catalog, constructed at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct BiomeCatalog {
    biomes: Vec<Biome>,
}

impl BiomeCatalog {
    /// Builds a catalog from an ordered biome list.
    #[must_use]
    pub fn new(biomes: Vec<Biome>) -> Self {
        Self { biomes }
    }

    /// Looks up a biome; out-of-range ids resolve to the first entry.
    #[must_use]
    pub fn get(&self, id: BiomeId) -> &Biome {
        self.biomes
            .get(usize::from(id.0))
            .unwrap_or(&self.biomes[0])
    }
}

/// Pure positional biome lookup.
pub trait BiomeSource: Send + Sync {
    /// The biome claiming the given block position.
    fn biome_at(&self, x: i32, y: i32, z: i32) -> BiomeId;
}

/// A biome source returning one biome everywhere; the baseline for tests
/// and single-biome dimensions.
pub struct FixedBiomeSource {
    /// The biome returned for every position.
    pub biome: BiomeId,
}

impl BiomeSource for FixedBiomeSource {
    fn biome_at(&self, _x: i32, _y: i32, _z: i32) -> BiomeId {
        self.biome
    }
}

/// Shared handle to a biome source strategy.
pub type SharedBiomeSource = Arc<dyn BiomeSource>;

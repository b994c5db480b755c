//! Material identifiers consumed and produced by the pipeline.

use serde::Deserialize;

/// Opaque identifier for a block material.
///
/// The engine never interprets these beyond equality; the embedding world
/// layer owns the mapping to real blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct MaterialId(pub u16);

/// The material set the pipeline needs to name explicitly.
#[derive(Debug, Clone, Deserialize)]
pub struct Materials {
    /// Air; written nowhere, but compared against everywhere.
    pub air: MaterialId,
    /// Default shallow solid material.
    pub stone: MaterialId,
    /// Default deep solid material (below the dithered transition band).
    pub deep_stone: MaterialId,
    /// Default surface fluid.
    pub water: MaterialId,
    /// Deep fluid; also the aquifer floor fluid.
    pub lava: MaterialId,
    /// Unbreakable world boundary material.
    pub bedrock: MaterialId,
    /// Surface ice for the frozen-ocean correction.
    pub ice: MaterialId,
    /// Dense ice for iceberg cores.
    pub packed_ice: MaterialId,
    /// Snow layer material placed atop icebergs and frozen peaks.
    pub snow: MaterialId,
}

impl Materials {
    /// Returns true if the material counts as a fluid for tick scheduling.
    #[inline]
    #[must_use]
    pub fn is_fluid(&self, material: MaterialId) -> bool {
        material == self.water || material == self.lava
    }
}

//! The terrain generator: per-world state, per-chunk task entry points,
//! and the parallel region driver.

use std::sync::Arc;

use rayon::prelude::*;
use strata_utils::random::{PositionalRandom, Random, RandomSplitter, Xoroshiro};

use crate::aquifer::{Aquifer, AquiferMaterials, AquiferNoises, SeaLevelAquifer, WorldAquifer};
use crate::beardifier::{Beardifier, SharedStructureSource};
use crate::biome::{BiomeCatalog, SharedBiomeSource};
use crate::chunk::{ChunkPos, ProtoChunk};
use crate::config::{GeneratorSettings, SettingsError};
use crate::density::{CaveComposer, NoodleModifier, TerrainSampler, post_process};
use crate::filler::ChunkFiller;
use crate::fluid::{FluidLevel, FluidPicker, StandardFluidPicker};
use crate::material::MaterialId;
use crate::ore::{OreVeinNoises, OreVeinSampler};
use crate::stone::BaseStoneSource;
use crate::surface::SurfaceSystem;
use crate::surface::rules::RuleTree;
use crate::surface_height::SurfaceHeightEstimator;

/// The aquifer floor fluid reaches up to this many blocks above the world
/// floor.
const FLOOR_FLUID_DEPTH: i32 = 10;

/// Derives an independent positional splitter for a named random stream.
fn derive_splitter(splitter: &RandomSplitter, name: &str) -> RandomSplitter {
    let mut random = splitter.with_hash_of(name);
    random.next_positional()
}

/// A fully constructed world generator.
///
/// Construction draws every noise from the seed in a fixed order and
/// validates the configuration; after that, all state is immutable and
/// chunk generation is embarrassingly parallel.
pub struct TerrainGenerator {
    seed: u64,
    settings: GeneratorSettings,
    catalog: Arc<BiomeCatalog>,
    biome_source: SharedBiomeSource,
    structures: SharedStructureSource,
    rule_tree: RuleTree,

    sampler: TerrainSampler,
    caves: Option<CaveComposer>,
    noodle: NoodleModifier,
    stone: BaseStoneSource,
    aquifer_noises: AquiferNoises,
    ore_noises: OreVeinNoises,
    surface: SurfaceSystem,

    aquifer_splitter: RandomSplitter,
    ore_splitter: RandomSplitter,
    bedrock_splitter: RandomSplitter,
}

impl TerrainGenerator {
    /// Builds a generator.
    ///
    /// `band_base`/`band_variants` seed the surface band table. Fails only
    /// on configuration validation; per-chunk generation cannot fail.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        seed: u64,
        settings: GeneratorSettings,
        catalog: Arc<BiomeCatalog>,
        biome_source: SharedBiomeSource,
        structures: SharedStructureSource,
        rule_tree: RuleTree,
        band_base: MaterialId,
        band_variants: &[MaterialId],
    ) -> Result<Self, SettingsError> {
        settings.validate()?;

        let mut world_random = Xoroshiro::from_seed(seed);
        let splitter = world_random.next_positional();

        // Noise construction order is part of the determinism contract.
        let mut terrain_random = splitter.with_hash_of("terrain");
        let sampler = TerrainSampler::new(
            &mut terrain_random,
            &settings,
            Arc::clone(&catalog),
            Arc::clone(&biome_source),
        );
        let caves = settings
            .noise_caves_enabled
            .then(|| CaveComposer::new(&splitter, &settings.shape));
        let noodle = NoodleModifier::new(&splitter, &settings.shape, settings.noodle_caves_enabled);
        let stone = BaseStoneSource::new(
            &settings.deep_stone,
            settings.materials.stone,
            settings.materials.deep_stone,
            derive_splitter(&splitter, "stone_depth"),
        );
        let aquifer_noises = AquiferNoises::new(&splitter);
        let ore_noises = OreVeinNoises::new(&splitter);
        let surface = SurfaceSystem::new(
            &splitter,
            settings.sea_level,
            settings.materials.clone(),
            band_base,
            band_variants,
        );

        Ok(Self {
            aquifer_splitter: derive_splitter(&splitter, "aquifer"),
            ore_splitter: derive_splitter(&splitter, "ore"),
            bedrock_splitter: derive_splitter(&splitter, "bedrock"),
            seed,
            settings,
            catalog,
            biome_source,
            structures,
            rule_tree,
            sampler,
            caves,
            noodle,
            stone,
            aquifer_noises,
            ore_noises,
            surface,
        })
    }

    /// The world seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The validated settings.
    #[must_use]
    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Creates an empty chunk shaped for this generator.
    #[must_use]
    pub fn new_chunk(&self, pos: ChunkPos) -> ProtoChunk {
        ProtoChunk::new(
            pos,
            self.settings.shape.min_y,
            self.settings.shape.height,
            self.settings.materials.air,
        )
    }

    fn fluid_picker(&self) -> FluidPicker {
        let materials = &self.settings.materials;
        let floor_top = self.settings.shape.min_y + FLOOR_FLUID_DEPTH;
        FluidPicker::Standard(StandardFluidPicker::new(
            FluidLevel::new(self.settings.sea_level, materials.water),
            FluidLevel::new(floor_top, materials.lava),
            floor_top,
        ))
    }

    /// Fills the chunk's bulk shapes (noise pass).
    pub fn fill_chunk(&self, chunk: &ProtoChunk) {
        let shape = &self.settings.shape;
        let materials = &self.settings.materials;
        let pos = chunk.pos();

        let mut estimator = SurfaceHeightEstimator::new(
            &self.sampler,
            shape.min_y,
            shape.max_y(),
            shape.vertical_cell_size as i32,
        );

        let beard = Beardifier::for_chunk(&*self.structures, pos.x, pos.z);

        let aquifer = if self.settings.aquifers_enabled {
            Aquifer::Worldwide(WorldAquifer::new(
                pos.x,
                pos.z,
                &self.aquifer_noises,
                self.aquifer_splitter,
                shape.min_y,
                shape.height,
                self.fluid_picker(),
                AquiferMaterials {
                    air: materials.air,
                    water: materials.water,
                    lava: materials.lava,
                },
            ))
        } else {
            Aquifer::SeaLevel(SeaLevelAquifer::new(self.fluid_picker(), materials.air))
        };

        let ore = self.settings.ore_veins_enabled.then(|| {
            OreVeinSampler::new(
                &self.ore_noises,
                self.ore_splitter,
                &self.settings.shallow_vein,
                &self.settings.deep_vein,
            )
        });

        let mut filler = ChunkFiller::new(
            &self.settings,
            &self.sampler,
            self.caves.as_ref(),
            &self.noodle,
            &self.stone,
            ore,
            beard,
            aquifer,
            self.bedrock_splitter,
        );
        filler.fill(chunk, &mut estimator);
    }

    /// Runs the surface-painting pass; requires the noise pass to have
    /// completed so the heightmaps are final.
    pub fn build_surface(&self, chunk: &ProtoChunk) {
        let shape = &self.settings.shape;
        let mut estimator = SurfaceHeightEstimator::new(
            &self.sampler,
            shape.min_y,
            shape.max_y(),
            shape.vertical_cell_size as i32,
        );
        self.surface.build_surface(
            chunk,
            &self.catalog,
            &*self.biome_source,
            &self.rule_tree,
            &mut estimator,
            shape,
        );
    }

    /// Generates a chunk end to end.
    pub fn generate_chunk(&self, chunk: &ProtoChunk) {
        self.fill_chunk(chunk);
        self.build_surface(chunk);
    }

    /// Generates a set of chunks on the worker pool.
    ///
    /// Chunks are independent tasks with no shared mutable state; a failed
    /// task propagates without poisoning its siblings.
    pub fn generate_region(&self, positions: &[ChunkPos]) -> anyhow::Result<Vec<ProtoChunk>> {
        log::debug!(
            "generating {} chunks (seed {})",
            positions.len(),
            self.seed
        );
        positions
            .par_iter()
            .map(|&pos| {
                let chunk = self.new_chunk(pos);
                self.generate_chunk(&chunk);
                Ok(chunk)
            })
            .collect()
    }

    /// Read-only base height query for spawn/feature collaborators.
    #[must_use]
    pub fn base_height(&self, x: i32, z: i32) -> i32 {
        let shape = &self.settings.shape;
        let mut estimator = SurfaceHeightEstimator::new(
            &self.sampler,
            shape.min_y,
            shape.max_y(),
            shape.vertical_cell_size as i32,
        );
        estimator.estimate(x, z)
    }

    /// Read-only base column query: the cheaper pipeline variant without
    /// aquifer surface effects and without writes.
    #[must_use]
    pub fn base_column(&self, x: i32, z: i32) -> Vec<MaterialId> {
        let shape = &self.settings.shape;
        let materials = &self.settings.materials;

        (shape.min_y..shape.max_y())
            .map(|y| {
                let base = self.sampler.density(x, y, z);
                let carved = match &self.caves {
                    Some(caves) => caves.apply(base, x, y, z),
                    None => base,
                };
                let density = self.noodle.apply(post_process(carved), x, y, z);
                if density > 0.0 {
                    self.stone.material(x, y, z)
                } else if y < self.settings.sea_level {
                    materials.water
                } else {
                    materials.air
                }
            })
            .collect()
    }
}

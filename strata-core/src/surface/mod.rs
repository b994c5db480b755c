//! Surface painting: the second full pass after bulk shapes exist.
//!
//! Walks each column top-down, replacing the generic solid materials near
//! the surface through a declarative rule tree, after applying the two
//! biome-driven column-shape corrections (badlands pillars, icebergs).

pub mod bands;
pub mod rules;

use strata_utils::math::{clamped_map, floor};
use strata_utils::noise::DoublePerlinNoise;
use strata_utils::random::{PositionalRandom, Random, RandomSplitter};

use crate::biome::{BiomeCatalog, BiomeId, BiomeSource, SurfaceCorrection};
use crate::chunk::heightmap::HeightmapKind;
use crate::chunk::ProtoChunk;
use crate::config::GenerationShape;
use crate::material::{MaterialId, Materials};
use crate::surface_height::SurfaceHeightEstimator;
use rules::{CaveSurface, ConditionId, ConditionNode, RuleId, RuleNode, RuleTree, SurfaceNoiseId};

/// Water-height sentinel meaning "no standing fluid above".
const NO_WATER: i32 = i32::MIN;
/// Height gradient (blocks over two columns) that reads as steep.
const STEEP_GRADIENT: i32 = 4;
/// Surface depth scaling of the primary surface noise.
const SURFACE_DEPTH_SCALE: f64 = 2.75;
const SURFACE_DEPTH_BASE: f64 = 3.0;
const SURFACE_DEPTH_JITTER: f64 = 0.25;
/// Band offset magnitude from the band-offset noise.
const BAND_OFFSET_SCALE: f64 = 4.0;

/// The noise set consumed by surface rules and corrections.
struct SurfaceNoises {
    surface: DoublePerlinNoise,
    secondary: DoublePerlinNoise,
    band_offset: DoublePerlinNoise,
    badlands_surface: DoublePerlinNoise,
    badlands_pillar: DoublePerlinNoise,
    badlands_pillar_roof: DoublePerlinNoise,
    iceberg_surface: DoublePerlinNoise,
    iceberg_pillar: DoublePerlinNoise,
    iceberg_pillar_roof: DoublePerlinNoise,
}

impl SurfaceNoises {
    fn new(splitter: &RandomSplitter) -> Self {
        Self {
            surface: DoublePerlinNoise::create(splitter, "surface", -6, &[1.0, 1.0, 1.0]),
            secondary: DoublePerlinNoise::create(
                splitter,
                "surface_secondary",
                -6,
                &[1.0, 1.0, 0.0, 1.0],
            ),
            band_offset: DoublePerlinNoise::create(splitter, "clay_bands_offset", -8, &[1.0]),
            badlands_surface: DoublePerlinNoise::create(
                splitter,
                "badlands_surface",
                -6,
                &[1.0, 1.0, 1.0],
            ),
            badlands_pillar: DoublePerlinNoise::create(
                splitter,
                "badlands_pillar",
                -2,
                &[1.0, 1.0, 1.0, 1.0],
            ),
            badlands_pillar_roof: DoublePerlinNoise::create(
                splitter,
                "badlands_pillar_roof",
                -1,
                &[1.0],
            ),
            iceberg_surface: DoublePerlinNoise::create(
                splitter,
                "iceberg_surface",
                -6,
                &[1.0, 1.0, 1.0],
            ),
            iceberg_pillar: DoublePerlinNoise::create(
                splitter,
                "iceberg_pillar",
                -6,
                &[1.0, 1.0, 1.0, 1.0],
            ),
            iceberg_pillar_roof: DoublePerlinNoise::create(
                splitter,
                "iceberg_pillar_roof",
                -3,
                &[1.0],
            ),
        }
    }
}

/// Mutable per-column cursor threaded through the rule tree.
///
/// Every condition result is memoized against `update_generation`; the
/// counter bumps whenever the cursor moves, so shared sub-conditions
/// compute once per cell no matter how often the tree references them.
pub struct SurfaceContext {
    /// Column biome.
    pub biome: BiomeId,
    /// World X of the column.
    pub block_x: i32,
    /// World Z of the column.
    pub block_z: i32,
    /// Y of the current cell.
    pub block_y: i32,
    /// Column surface depth drawn from the surface noise.
    pub surface_depth: i32,
    /// Whether the column reads as steep against its neighbors.
    pub steep: bool,
    /// Cached preliminary surface estimate for this column.
    pub min_surface_level: i32,
    /// One above the highest standing fluid over the cell, or [`NO_WATER`].
    pub water_height: i32,
    /// Solid run length ending at this cell, counted from above.
    pub stone_depth_above: i32,
    /// Solid run length continuing below this cell.
    pub stone_depth_below: i32,
    /// Column band shift for the bands rule.
    pub band_offset: i32,

    update_generation: u64,
    cache: Vec<(u64, bool)>,
    /// Number of condition evaluations that actually computed (cache
    /// misses). Exposed for memoization verification.
    pub condition_evals: u64,
}

impl SurfaceContext {
    /// Creates a context sized for a tree's condition arena.
    #[must_use]
    pub fn new(condition_count: usize) -> Self {
        Self {
            biome: BiomeId(0),
            block_x: 0,
            block_z: 0,
            block_y: 0,
            surface_depth: 0,
            steep: false,
            min_surface_level: 0,
            water_height: NO_WATER,
            stone_depth_above: 0,
            stone_depth_below: 0,
            band_offset: 0,
            update_generation: 0,
            cache: vec![(u64::MAX, false); condition_count],
            condition_evals: 0,
        }
    }

    /// Repoints the cursor at a new column.
    #[allow(clippy::too_many_arguments)]
    pub fn start_column(
        &mut self,
        biome: BiomeId,
        block_x: i32,
        block_z: i32,
        surface_depth: i32,
        steep: bool,
        min_surface_level: i32,
        band_offset: i32,
    ) {
        self.biome = biome;
        self.block_x = block_x;
        self.block_z = block_z;
        self.surface_depth = surface_depth;
        self.steep = steep;
        self.min_surface_level = min_surface_level;
        self.band_offset = band_offset;
        self.update_generation += 1;
    }

    /// Moves the cursor to a cell within the column, invalidating memoized
    /// conditions.
    pub fn update_cell(
        &mut self,
        block_y: i32,
        stone_depth_above: i32,
        stone_depth_below: i32,
        water_height: i32,
    ) {
        self.block_y = block_y;
        self.stone_depth_above = stone_depth_above;
        self.stone_depth_below = stone_depth_below;
        self.water_height = water_height;
        self.update_generation += 1;
    }
}

/// Read-only inputs for rule evaluation.
pub struct SurfaceEnv<'a> {
    noises: &'a SurfaceNoises,
    /// Band table for the bands rule.
    bands: &'a [MaterialId],
    catalog: &'a BiomeCatalog,
    min_y: i32,
    max_y: i32,
}

impl RuleTree {
    /// Evaluates the tree for the context's current cell.
    #[must_use]
    pub fn apply(&self, env: &SurfaceEnv<'_>, ctx: &mut SurfaceContext) -> Option<MaterialId> {
        self.eval_rule(self.root, env, ctx)
    }

    fn eval_rule(
        &self,
        id: RuleId,
        env: &SurfaceEnv<'_>,
        ctx: &mut SurfaceContext,
    ) -> Option<MaterialId> {
        match &self.rules[id.0] {
            RuleNode::Block(material) => Some(*material),
            RuleNode::Sequence(children) => children
                .iter()
                .find_map(|&child| self.eval_rule(child, env, ctx)),
            RuleNode::Conditional {
                condition,
                then_rule,
            } => {
                if self.test_condition(*condition, env, ctx) {
                    self.eval_rule(*then_rule, env, ctx)
                } else {
                    None
                }
            }
            RuleNode::Bands => Some(bands::band_at(env.bands, ctx.block_y, ctx.band_offset)),
        }
    }

    /// Tests a condition with per-cell memoization.
    pub(crate) fn test_condition(
        &self,
        id: ConditionId,
        env: &SurfaceEnv<'_>,
        ctx: &mut SurfaceContext,
    ) -> bool {
        let (generation, cached) = ctx.cache[id.0];
        if generation == ctx.update_generation {
            return cached;
        }

        let value = self.compute_condition(id, env, ctx);
        ctx.cache[id.0] = (ctx.update_generation, value);
        ctx.condition_evals += 1;
        value
    }

    fn compute_condition(
        &self,
        id: ConditionId,
        env: &SurfaceEnv<'_>,
        ctx: &mut SurfaceContext,
    ) -> bool {
        match &self.conditions[id.0] {
            ConditionNode::Biome(biomes) => biomes.contains(&ctx.biome),
            ConditionNode::NoiseRange { noise, min, max } => {
                let sampler = match noise {
                    SurfaceNoiseId::Surface => &env.noises.surface,
                    SurfaceNoiseId::Secondary => &env.noises.secondary,
                };
                let value =
                    sampler.sample(f64::from(ctx.block_x), 0.0, f64::from(ctx.block_z));
                (*min..=*max).contains(&value)
            }
            ConditionNode::YAbove {
                anchor,
                surface_depth_multiplier,
            } => {
                ctx.block_y
                    >= anchor.resolve(env.min_y, env.max_y)
                        + ctx.surface_depth * surface_depth_multiplier
            }
            ConditionNode::StoneDepth {
                offset,
                add_surface_depth,
                secondary_depth_range,
                surface,
            } => {
                let depth = match surface {
                    CaveSurface::Floor => ctx.stone_depth_above,
                    CaveSurface::Ceiling => ctx.stone_depth_below,
                };
                let surface_part = if *add_surface_depth {
                    ctx.surface_depth
                } else {
                    0
                };
                let secondary_part = if *secondary_depth_range > 0 {
                    let secondary = env.noises.secondary.sample(
                        f64::from(ctx.block_x),
                        0.0,
                        f64::from(ctx.block_z),
                    );
                    floor(clamped_map(
                        secondary,
                        -1.0,
                        1.0,
                        0.0,
                        f64::from(*secondary_depth_range),
                    ))
                } else {
                    0
                };
                depth <= 1 + offset + surface_part + secondary_part
            }
            ConditionNode::Steep => ctx.steep,
            ConditionNode::Frozen => env.catalog.get(ctx.biome).is_freezing_at(ctx.block_y),
            ConditionNode::AbovePreliminarySurface => ctx.block_y >= ctx.min_surface_level,
            ConditionNode::Hole => ctx.surface_depth <= 0,
            ConditionNode::WaterDepth {
                offset,
                surface_depth_multiplier,
            } => {
                ctx.water_height == NO_WATER
                    || ctx.block_y + offset
                        >= ctx.water_height + ctx.surface_depth * surface_depth_multiplier
            }
            ConditionNode::Not(inner) => {
                let inner = *inner;
                !self.test_condition(inner, env, ctx)
            }
        }
    }
}

/// The surface-painting pass.
pub struct SurfaceSystem {
    noises: SurfaceNoises,
    bands: Box<[MaterialId]>,
    splitter: RandomSplitter,
    sea_level: i32,
    materials: Materials,
}

impl SurfaceSystem {
    /// Builds the surface system from the world splitter.
    ///
    /// `band_base`/`band_variants` seed the striped band table; pass an
    /// empty variant list for dimensions without banded biomes.
    #[must_use]
    pub fn new(
        splitter: &RandomSplitter,
        sea_level: i32,
        materials: Materials,
        band_base: MaterialId,
        band_variants: &[MaterialId],
    ) -> Self {
        let noises = SurfaceNoises::new(splitter);
        let mut band_random = splitter.with_hash_of("clay_bands");
        let bands = bands::make_bands(&mut band_random, band_base, band_variants);
        Self {
            noises,
            bands,
            splitter: *splitter,
            sea_level,
            materials,
        }
    }

    /// Column surface depth: noise plus a quarter-block positional jitter.
    #[must_use]
    pub fn surface_depth(&self, x: i32, z: i32) -> i32 {
        let noise = self
            .noises
            .surface
            .sample(f64::from(x), 0.0, f64::from(z));
        let jitter =
            self.splitter.at(x, 0, z).next_f64() * SURFACE_DEPTH_JITTER;
        floor(noise * SURFACE_DEPTH_SCALE + SURFACE_DEPTH_BASE + jitter)
    }

    fn band_offset(&self, x: i32, z: i32) -> i32 {
        floor(
            self.noises
                .band_offset
                .sample(f64::from(x), 0.0, f64::from(z))
                * BAND_OFFSET_SCALE,
        )
    }

    /// Repaints the top layers of every column in the chunk.
    #[allow(clippy::too_many_lines)]
    pub fn build_surface(
        &self,
        chunk: &ProtoChunk,
        catalog: &BiomeCatalog,
        source: &dyn BiomeSource,
        tree: &RuleTree,
        estimator: &mut SurfaceHeightEstimator<'_>,
        shape: &GenerationShape,
    ) {
        let min_x = chunk.pos().min_block_x();
        let min_z = chunk.pos().min_block_z();
        let min_y = shape.min_y;
        let max_y = shape.max_y();

        let env = SurfaceEnv {
            noises: &self.noises,
            bands: &self.bands,
            catalog,
            min_y,
            max_y,
        };
        let mut ctx = SurfaceContext::new(tree.condition_count());

        for local_x in 0..16usize {
            for local_z in 0..16usize {
                let x = min_x + local_x as i32;
                let z = min_z + local_z as i32;

                let top = chunk.surface(HeightmapKind::WorldSurface, local_x, local_z);
                if top < min_y {
                    continue;
                }

                let biome_id = source.biome_at(x, top, z);
                match catalog.get(biome_id).surface_correction {
                    SurfaceCorrection::None => {}
                    SurfaceCorrection::BadlandsPillars => {
                        self.extend_badlands(chunk, local_x, local_z, x, z);
                    }
                    SurfaceCorrection::Icebergs => {
                        self.extend_icebergs(chunk, local_x, local_z, x, z, catalog.get(biome_id));
                    }
                }

                let top = chunk.surface(HeightmapKind::WorldSurface, local_x, local_z);
                ctx.start_column(
                    biome_id,
                    x,
                    z,
                    self.surface_depth(x, z),
                    is_steep(chunk, local_x, local_z),
                    estimator.estimate(x, z),
                    self.band_offset(x, z),
                );

                self.paint_column(chunk, &env, &mut ctx, tree, local_x, local_z, top, min_y);
            }
        }
    }

    /// Walks one column top-down, evaluating the rule tree on every default
    /// solid block.
    #[allow(clippy::too_many_arguments)]
    fn paint_column(
        &self,
        chunk: &ProtoChunk,
        env: &SurfaceEnv<'_>,
        ctx: &mut SurfaceContext,
        tree: &RuleTree,
        local_x: usize,
        local_z: usize,
        top: i32,
        min_y: i32,
    ) {
        // Column snapshot; run lengths need lookahead below the cursor.
        let height = (top - min_y + 1) as usize;
        let column: Vec<MaterialId> = (0..height)
            .map(|i| chunk.get_block(local_x, top - i as i32, local_z))
            .collect();
        let solid: Vec<bool> = column
            .iter()
            .map(|&m| m != self.materials.air && !self.materials.is_fluid(m))
            .collect();

        // Solid run continuing below each index (index 0 = top).
        let mut below_run = vec![0i32; height];
        for i in (0..height).rev() {
            if solid[i] {
                below_run[i] = 1 + if i + 1 < height { below_run[i + 1] } else { 0 };
            }
        }

        let mut stone_depth_above = 0i32;
        let mut water_height = NO_WATER;

        for (i, &material) in column.iter().enumerate() {
            let y = top - i as i32;

            if material == self.materials.air {
                stone_depth_above = 0;
                water_height = NO_WATER;
                continue;
            }
            if self.materials.is_fluid(material) {
                stone_depth_above = 0;
                if water_height == NO_WATER {
                    water_height = y + 1;
                }
                continue;
            }

            stone_depth_above += 1;

            // Only the generic solids are repainted; ore, bedrock, and
            // corrections keep their materials.
            if material != self.materials.stone && material != self.materials.deep_stone {
                continue;
            }

            ctx.update_cell(y, stone_depth_above, below_run[i], water_height);
            if let Some(painted) = tree.apply(env, ctx) {
                if painted != material {
                    let is_fluid = self.materials.is_fluid(painted);
                    chunk.set_block(local_x, y, local_z, painted, is_fluid);
                }
            }
        }
    }

    /// Eroded-badlands pillar extension: raises select columns into tall
    /// rock spires before rule evaluation.
    fn extend_badlands(&self, chunk: &ProtoChunk, local_x: usize, local_z: usize, x: i32, z: i32) {
        let (xf, zf) = (f64::from(x), f64::from(z));

        let pillar = (self.noises.badlands_surface.sample(xf, 0.0, zf) * 8.25)
            .abs()
            .min(self.noises.badlands_pillar.sample(xf * 0.2, 0.0, zf * 0.2) * 15.0);
        if pillar <= 0.0 {
            return;
        }

        let roof = (self
            .noises
            .badlands_pillar_roof
            .sample(xf * 0.75, 0.0, zf * 0.75)
            * 1.5)
            .abs();
        let target = 64.0 + (pillar * pillar * 2.5).min((roof * 50.0).ceil() + 24.0);
        let target_y = floor(target);

        let top = chunk.surface(HeightmapKind::WorldSurface, local_x, local_z);
        if target_y <= top {
            return;
        }
        for y in (top + 1)..=target_y {
            chunk.set_block(local_x, y, local_z, self.materials.stone, false);
        }
    }

    /// Frozen-ocean iceberg extension: stacks packed ice above the water
    /// line and freezes the water column beneath, snow-capping the top.
    fn extend_icebergs(
        &self,
        chunk: &ProtoChunk,
        local_x: usize,
        local_z: usize,
        x: i32,
        z: i32,
        biome: &crate::biome::Biome,
    ) {
        let (xf, zf) = (f64::from(x), f64::from(z));

        let mut berg = (self.noises.iceberg_surface.sample(xf, 0.0, zf) * 8.25)
            .abs()
            .min(self.noises.iceberg_pillar.sample(xf * 1.28, 0.0, zf * 1.28) * 15.0);
        if berg <= 1.8 {
            return;
        }
        let roof = (self
            .noises
            .iceberg_pillar_roof
            .sample(xf * 1.17, 0.0, zf * 1.17)
            * 1.5)
            .abs();
        berg = (berg * berg * 1.2).min((roof * 40.0).ceil() + 14.0);
        if biome.temperature_at(self.sea_level) > 0.1 {
            berg -= 2.0;
        }
        if berg <= 2.0 {
            return;
        }

        let freeze_bottom = self.sea_level - berg as i32 - 7;
        let ice_top = self.sea_level + berg as i32;

        let mut random = self.splitter.at(x, 0, z);
        let snow_cap = 2 + random.next_i32_bounded(4);
        let snow_start = self.sea_level + 18 + random.next_i32_bounded(10);

        let mut placed_snow = 0;
        for y in (freeze_bottom..=ice_top).rev() {
            if y < chunk.min_y() || y >= chunk.max_y() {
                continue;
            }
            let current = chunk.get_block(local_x, y, local_z);
            if current == self.materials.air && y > self.sea_level {
                if placed_snow < snow_cap && y > snow_start {
                    chunk.set_block(local_x, y, local_z, self.materials.snow, false);
                    placed_snow += 1;
                } else {
                    chunk.set_block(local_x, y, local_z, self.materials.packed_ice, false);
                }
            } else if current == self.materials.water {
                chunk.set_block(local_x, y, local_z, self.materials.packed_ice, false);
            }
        }
    }
}

/// A column is steep when the chunk-local heightmap drops by
/// [`STEEP_GRADIENT`] or more across its immediate neighbors.
fn is_steep(chunk: &ProtoChunk, local_x: usize, local_z: usize) -> bool {
    let height = |lx: usize, lz: usize| {
        chunk.surface(
            HeightmapKind::WorldSurface,
            lx.clamp(0, 15),
            lz.clamp(0, 15),
        )
    };
    let north_south = height(local_x, (local_z + 1).min(15)) - height(local_x, local_z.saturating_sub(1));
    let east_west = height((local_x + 1).min(15), local_z) - height(local_x.saturating_sub(1), local_z);
    north_south.abs() >= STEEP_GRADIENT || east_west.abs() >= STEEP_GRADIENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{Biome, SurfaceCorrection};
    use crate::surface::rules::RuleTreeBuilder;
    use strata_utils::random::{Random, Xoroshiro};

    fn materials() -> Materials {
        Materials {
            air: MaterialId(0),
            stone: MaterialId(1),
            deep_stone: MaterialId(2),
            water: MaterialId(3),
            lava: MaterialId(4),
            bedrock: MaterialId(5),
            ice: MaterialId(6),
            packed_ice: MaterialId(7),
            snow: MaterialId(8),
        }
    }

    fn system() -> SurfaceSystem {
        let mut rng = Xoroshiro::from_seed(12345);
        let splitter = rng.next_positional();
        SurfaceSystem::new(&splitter, 63, materials(), MaterialId(30), &[MaterialId(31)])
    }

    fn catalog() -> BiomeCatalog {
        BiomeCatalog::new(vec![Biome {
            depth: 0.0,
            scale: 0.05,
            temperature: 0.8,
            exaggerated: false,
            surface_correction: SurfaceCorrection::None,
        }])
    }

    fn env<'a>(system: &'a SurfaceSystem, catalog: &'a BiomeCatalog) -> SurfaceEnv<'a> {
        SurfaceEnv {
            noises: &system.noises,
            bands: &system.bands,
            catalog,
            min_y: -64,
            max_y: 320,
        }
    }

    #[test]
    fn test_memoized_condition_computes_once() {
        let system = system();
        let catalog = catalog();
        let env = env(&system, &catalog);

        let mut builder = RuleTreeBuilder::new();
        let steep = builder.condition(ConditionNode::Steep);
        let block = builder.block(MaterialId(40));
        let gated = builder.conditional(steep, block);
        // The same condition referenced twice in one sequence.
        let gated_again = builder.conditional(steep, block);
        let root = builder.sequence(vec![gated, gated_again]);
        let tree = builder.build(root);

        let mut ctx = SurfaceContext::new(tree.condition_count());
        ctx.start_column(BiomeId(0), 0, 0, 3, false, 60, 0);
        ctx.update_cell(50, 1, 5, NO_WATER);

        let _ = tree.apply(&env, &mut ctx);
        assert_eq!(ctx.condition_evals, 1, "shared condition must compute once");

        // Re-evaluating without a coordinate change hits the cache.
        let _ = tree.apply(&env, &mut ctx);
        assert_eq!(ctx.condition_evals, 1);

        // Moving the cursor invalidates.
        ctx.update_cell(49, 2, 4, NO_WATER);
        let _ = tree.apply(&env, &mut ctx);
        assert_eq!(ctx.condition_evals, 2);
    }

    #[test]
    fn test_sequence_first_match_wins() {
        let system = system();
        let catalog = catalog();
        let env = env(&system, &catalog);

        let mut builder = RuleTreeBuilder::new();
        let steep = builder.condition(ConditionNode::Steep);
        let not_steep = builder.not(steep);
        let a = builder.block(MaterialId(41));
        let b = builder.block(MaterialId(42));
        let first = builder.conditional(steep, a);
        let second = builder.conditional(not_steep, b);
        let root = builder.sequence(vec![first, second]);
        let tree = builder.build(root);

        let mut ctx = SurfaceContext::new(tree.condition_count());
        ctx.start_column(BiomeId(0), 0, 0, 3, true, 60, 0);
        ctx.update_cell(50, 1, 5, NO_WATER);
        assert_eq!(tree.apply(&env, &mut ctx), Some(MaterialId(41)));

        ctx.start_column(BiomeId(0), 0, 0, 3, false, 60, 0);
        ctx.update_cell(50, 1, 5, NO_WATER);
        assert_eq!(tree.apply(&env, &mut ctx), Some(MaterialId(42)));
    }

    #[test]
    fn test_stone_depth_floor_condition() {
        let system = system();
        let catalog = catalog();
        let env = env(&system, &catalog);

        let mut builder = RuleTreeBuilder::new();
        let near_floor = builder.condition(ConditionNode::StoneDepth {
            offset: 0,
            add_surface_depth: false,
            secondary_depth_range: 0,
            surface: CaveSurface::Floor,
        });
        let block = builder.block(MaterialId(50));
        let root = builder.conditional(near_floor, block);
        let tree = builder.build(root);

        let mut ctx = SurfaceContext::new(tree.condition_count());
        ctx.start_column(BiomeId(0), 0, 0, 3, false, 60, 0);
        // Surface block: depth 1 <= 1.
        ctx.update_cell(64, 1, 10, NO_WATER);
        assert_eq!(tree.apply(&env, &mut ctx), Some(MaterialId(50)));
        // Two below: depth 2 > 1.
        ctx.update_cell(62, 3, 8, NO_WATER);
        assert_eq!(tree.apply(&env, &mut ctx), None);
    }

    #[test]
    fn test_water_depth_condition() {
        let system = system();
        let catalog = catalog();
        let env = env(&system, &catalog);

        let mut builder = RuleTreeBuilder::new();
        let dry = builder.condition(ConditionNode::WaterDepth {
            offset: -1,
            surface_depth_multiplier: 0,
        });
        let block = builder.block(MaterialId(51));
        let root = builder.conditional(dry, block);
        let tree = builder.build(root);

        let mut ctx = SurfaceContext::new(tree.condition_count());
        ctx.start_column(BiomeId(0), 0, 0, 3, false, 60, 0);
        // No water above: condition holds.
        ctx.update_cell(64, 1, 10, NO_WATER);
        assert_eq!(tree.apply(&env, &mut ctx), Some(MaterialId(51)));
        // Deep under water: condition fails.
        ctx.update_cell(40, 1, 10, 63);
        assert_eq!(tree.apply(&env, &mut ctx), None);
    }

    #[test]
    fn test_y_above_with_surface_depth() {
        let system = system();
        let catalog = catalog();
        let env = env(&system, &catalog);

        let mut builder = RuleTreeBuilder::new();
        let above = builder.condition(ConditionNode::YAbove {
            anchor: rules::VerticalAnchor::Absolute(60),
            surface_depth_multiplier: -1,
        });
        let block = builder.block(MaterialId(52));
        let root = builder.conditional(above, block);
        let tree = builder.build(root);

        let mut ctx = SurfaceContext::new(tree.condition_count());
        ctx.start_column(BiomeId(0), 0, 0, 3, false, 60, 0);
        // Threshold = 60 - 3 = 57.
        ctx.update_cell(57, 1, 10, NO_WATER);
        assert_eq!(tree.apply(&env, &mut ctx), Some(MaterialId(52)));
        ctx.update_cell(56, 1, 10, NO_WATER);
        assert_eq!(tree.apply(&env, &mut ctx), None);
    }
}

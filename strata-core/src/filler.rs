//! Chunk filler: orchestrates sampler, modifiers, beardifier, and aquifer
//! over the coarse cell sweep, writing blocks and bookkeeping as it goes.

use strata_utils::math::floor_div;
use strata_utils::random::{PositionalRandom, Random, RandomSplitter};

use crate::aquifer::Aquifer;
use crate::beardifier::Beardifier;
use crate::chunk::{ProtoChunk, ScheduledFluidTick};
use crate::config::GeneratorSettings;
use crate::density::{CaveComposer, CellInterpolator, NoodleModifier, TerrainSampler, post_process};
use crate::material::MaterialId;
use crate::ore::OreVeinSampler;
use crate::stone::BaseStoneSource;
use crate::surface_height::SurfaceHeightEstimator;

/// Per-chunk fill pass.
///
/// The fixed evaluation order per block is sampler → cave → post-process →
/// noodle → beardifier at cell corners, then per-block interpolation and
/// aquifer resolution. Nothing here reads neighbor chunks; every output is
/// a function of absolute coordinates and the seed.
pub struct ChunkFiller<'a> {
    settings: &'a GeneratorSettings,
    sampler: &'a TerrainSampler,
    caves: Option<&'a CaveComposer>,
    noodle: &'a NoodleModifier,
    stone: &'a BaseStoneSource,
    ore: Option<OreVeinSampler<'a>>,
    beard: Beardifier,
    aquifer: Aquifer<'a>,
    bedrock_splitter: RandomSplitter,
}

impl<'a> ChunkFiller<'a> {
    /// Assembles a filler from per-world components and per-chunk state.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        settings: &'a GeneratorSettings,
        sampler: &'a TerrainSampler,
        caves: Option<&'a CaveComposer>,
        noodle: &'a NoodleModifier,
        stone: &'a BaseStoneSource,
        ore: Option<OreVeinSampler<'a>>,
        beard: Beardifier,
        aquifer: Aquifer<'a>,
        bedrock_splitter: RandomSplitter,
    ) -> Self {
        Self {
            settings,
            sampler,
            caves,
            noodle,
            stone,
            ore,
            beard,
            aquifer,
            bedrock_splitter,
        }
    }

    /// Fully modified density at a coarse corner.
    fn corner_density(&self, x: i32, y: i32, z: i32) -> f64 {
        let base = self.sampler.density(x, y, z);
        let carved = match self.caves {
            Some(caves) => caves.apply(base, x, y, z),
            None => base,
        };
        let shaped = self.noodle.apply(post_process(carved), x, y, z);
        shaped + self.beard.bias_at(x, y, z)
    }

    /// Fills the chunk's bulk shapes.
    pub fn fill(&mut self, chunk: &ProtoChunk, estimator: &mut SurfaceHeightEstimator<'_>) {
        let shape = &self.settings.shape;
        let h = shape.horizontal_cell_size as i32;
        let v = shape.vertical_cell_size as i32;
        let horizontal_cells = 16 / h;
        let vertical_cells = shape.vertical_cell_count() as i32;
        let min_cell_y = floor_div(shape.min_y, v);

        let base_x = chunk.pos().min_block_x();
        let base_z = chunk.pos().min_block_z();
        let start_cell_x = floor_div(base_x, h);
        let start_cell_z = floor_div(base_z, h);

        let mut interp =
            CellInterpolator::new(vertical_cells as usize, horizontal_cells as usize);

        let slice_x = start_cell_x * h;
        interp.fill_slice(true, horizontal_cells as usize, |cell_y, cell_z| {
            self.corner_density(
                slice_x,
                (min_cell_y + cell_y as i32) * v,
                (start_cell_z + cell_z as i32) * h,
            )
        });

        for cell_x in 0..horizontal_cells {
            let slice_x = (start_cell_x + cell_x + 1) * h;
            interp.fill_slice(false, horizontal_cells as usize, |cell_y, cell_z| {
                self.corner_density(
                    slice_x,
                    (min_cell_y + cell_y as i32) * v,
                    (start_cell_z + cell_z as i32) * h,
                )
            });

            for cell_z in 0..horizontal_cells {
                for cell_y in (0..vertical_cells).rev() {
                    interp.select_corners(cell_y as usize, cell_z as usize);

                    for local_y in (0..v).rev() {
                        let y = (min_cell_y + cell_y) * v + local_y;
                        interp.interpolate_y(f64::from(local_y) / f64::from(v));

                        for local_x in 0..h {
                            let x = base_x + cell_x * h + local_x;
                            interp.interpolate_x(f64::from(local_x) / f64::from(h));

                            for local_z in 0..h {
                                let z = base_z + cell_z * h + local_z;
                                interp.interpolate_z(f64::from(local_z) / f64::from(h));

                                let density = interp.value();
                                let material = self.resolve(x, y, z, density, estimator);
                                if material == self.settings.materials.air {
                                    continue;
                                }

                                let local_x_idx = (x - base_x) as usize;
                                let local_z_idx = (z - base_z) as usize;
                                let is_fluid = self.settings.materials.is_fluid(material);
                                chunk.set_block(local_x_idx, y, local_z_idx, material, is_fluid);

                                if is_fluid && self.aquifer.needs_fluid_tick() {
                                    chunk.schedule_fluid_tick(ScheduledFluidTick {
                                        x,
                                        y,
                                        z,
                                        fluid: material,
                                    });
                                }
                            }
                        }
                    }
                }
            }

            interp.swap_slices();
        }

        self.place_bedrock(chunk);
    }

    /// Aquifer first, then ore veins, then the base stone source.
    fn resolve(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        density: f64,
        estimator: &mut SurfaceHeightEstimator<'_>,
    ) -> MaterialId {
        if let Some(material) = self.aquifer.resolve(x, y, z, density, estimator) {
            return material;
        }
        if let Some(ore) = &self.ore {
            if let Some(material) = ore.sample(x, y, z) {
                return material;
            }
        }
        self.stone.material(x, y, z)
    }

    /// Floor and roof bedrock bands with a per-column random layer count.
    fn place_bedrock(&self, chunk: &ProtoChunk) {
        let bedrock = self.settings.materials.bedrock;
        let min_y = self.settings.shape.min_y;
        let max_y = self.settings.shape.max_y();
        let base_x = chunk.pos().min_block_x();
        let base_z = chunk.pos().min_block_z();

        let floor_depth = self.settings.bedrock.floor_depth as i32;
        let roof_depth = self.settings.bedrock.roof_depth as i32;

        for local_x in 0..16usize {
            for local_z in 0..16usize {
                let x = base_x + local_x as i32;
                let z = base_z + local_z as i32;

                if floor_depth > 0 {
                    let mut random = self.bedrock_splitter.at(x, min_y, z);
                    let layers = 1 + random.next_i32_bounded(floor_depth);
                    for i in 0..layers {
                        chunk.set_block(local_x, min_y + i, local_z, bedrock, false);
                    }
                }

                if roof_depth > 0 {
                    let mut random = self.bedrock_splitter.at(x, max_y, z);
                    let layers = 1 + random.next_i32_bounded(roof_depth);
                    for i in 0..layers {
                        chunk.set_block(local_x, max_y - 1 - i, local_z, bedrock, false);
                    }
                }
            }
        }
    }
}

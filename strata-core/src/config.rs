//! Immutable world configuration, validated once at generator construction.

use serde::Deserialize;
use thiserror::Error;

use crate::material::{MaterialId, Materials};

/// Absolute ceiling no dimension may generate past.
pub const ABSOLUTE_MAX_Y: i32 = 2032;

/// Vertical bounds and cell sizes for terrain generation.
///
/// | Preset    | Min Y | Height | Horizontal cell | Vertical cell |
/// |-----------|-------|--------|-----------------|---------------|
/// | Overworld | -64   | 384    | 4               | 8             |
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationShape {
    /// Minimum Y coordinate (inclusive).
    pub min_y: i32,
    /// Total generated height in blocks.
    pub height: u32,
    /// Cell size in blocks along X and Z.
    pub horizontal_cell_size: u32,
    /// Cell size in blocks along Y.
    pub vertical_cell_size: u32,
}

impl GenerationShape {
    /// The overworld generation shape.
    #[must_use]
    pub const fn overworld() -> Self {
        Self {
            min_y: -64,
            height: 384,
            horizontal_cell_size: 4,
            vertical_cell_size: 8,
        }
    }

    /// Maximum Y coordinate (exclusive).
    #[inline]
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.min_y + self.height as i32
    }

    /// Number of cells along Y.
    #[inline]
    #[must_use]
    pub const fn vertical_cell_count(&self) -> usize {
        (self.height / self.vertical_cell_size) as usize
    }

    /// Number of cells along X/Z within one 16-block chunk.
    #[inline]
    #[must_use]
    pub const fn horizontal_cell_count(&self) -> usize {
        (16 / self.horizontal_cell_size) as usize
    }
}

/// Input scaling for the blended body noise.
#[derive(Debug, Clone, Deserialize)]
pub struct NoiseScaling {
    /// Horizontal input scale.
    pub xz_scale: f64,
    /// Vertical input scale.
    pub y_scale: f64,
    /// Horizontal selector divisor.
    pub xz_factor: f64,
    /// Vertical selector divisor.
    pub y_factor: f64,
    /// Vertical smear applied inside the body octaves.
    pub smear_scale_multiplier: f64,
}

impl NoiseScaling {
    /// Overworld scaling.
    #[must_use]
    pub const fn overworld() -> Self {
        Self {
            xz_scale: 0.25,
            y_scale: 0.125,
            xz_factor: 80.0,
            y_factor: 160.0,
            smear_scale_multiplier: 8.0,
        }
    }
}

/// Body noise source: the real blended tower, or a constant for testing and
/// degenerate dimensions.
#[derive(Debug, Clone, Deserialize)]
pub enum BodyNoiseSettings {
    /// Blended three-stack noise with the given scaling.
    Blended(NoiseScaling),
    /// A constant value everywhere.
    Constant(f64),
}

/// A linear density slide toward a target value over a Y band.
///
/// The factor runs from `1.0` at `from_y` to `0.0` at `to_y`; density is
/// `lerp(factor, target, density)`, so the side past `to_y` is fully slid.
#[derive(Debug, Clone, Deserialize)]
pub struct Slide {
    /// Density value slid toward.
    pub target: f64,
    /// Y where the slide begins (factor 1.0, density untouched).
    pub from_y: i32,
    /// Y where the slide saturates (factor 0.0, density = target).
    pub to_y: i32,
}

/// Dithered transition band between shallow and deep solid material.
#[derive(Debug, Clone, Deserialize)]
pub struct DeepStoneSettings {
    /// Whether deep material generates at all.
    pub enabled: bool,
    /// Below this Y the material is always deep.
    pub low_y: i32,
    /// At or above this Y the material is always shallow.
    pub high_y: i32,
}

/// Bedrock band depths at the world floor and roof.
#[derive(Debug, Clone, Deserialize)]
pub struct BedrockSettings {
    /// Maximum bedrock layers above `min_y` (0 disables the floor band).
    pub floor_depth: u32,
    /// Maximum bedrock layers below `max_y` (0 disables the roof band).
    pub roof_depth: u32,
}

/// One ore vein family: materials and the vertical range it may occupy.
#[derive(Debug, Clone, Deserialize)]
pub struct VeinFamily {
    /// Ore placed at or above Y 0.
    pub ore: MaterialId,
    /// Ore placed below Y 0.
    pub deep_ore: MaterialId,
    /// Rare solid-ore block.
    pub raw_ore: MaterialId,
    /// Inert filler stone marking the vein body.
    pub filler: MaterialId,
    /// Lowest Y a vein block may occupy.
    pub min_y: i32,
    /// Highest Y a vein block may occupy.
    pub max_y: i32,
}

/// Complete generator configuration. Immutable after validation.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorSettings {
    /// Vertical bounds and cell sizes.
    pub shape: GenerationShape,
    /// Body noise source.
    pub body_noise: BodyNoiseSettings,
    /// Scale applied to the depth/scale gradient term.
    pub density_factor: f64,
    /// Constant added to the density before modifiers.
    pub density_offset: f64,
    /// Slide toward the world roof.
    pub top_slide: Slide,
    /// Slide toward the world floor.
    pub bottom_slide: Slide,
    /// Global fluid surface level.
    pub sea_level: i32,
    /// Underground fluid pockets.
    pub aquifers_enabled: bool,
    /// Noise cave carving.
    pub noise_caves_enabled: bool,
    /// Large ore veins.
    pub ore_veins_enabled: bool,
    /// Worm caves.
    pub noodle_caves_enabled: bool,
    /// Deep-material transition band.
    pub deep_stone: DeepStoneSettings,
    /// Bedrock bands.
    pub bedrock: BedrockSettings,
    /// Named materials.
    pub materials: Materials,
    /// Vein family chosen where veininess is positive.
    pub shallow_vein: VeinFamily,
    /// Vein family chosen where veininess is negative.
    pub deep_vein: VeinFamily,
}

/// Configuration rejection reasons. These abort generator construction;
/// nothing here can occur during per-chunk generation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// World height is not a multiple of the vertical cell size.
    #[error("height {height} is not a multiple of the vertical cell size {cell}")]
    HeightNotCellAligned {
        /// Configured height.
        height: u32,
        /// Configured vertical cell size.
        cell: u32,
    },
    /// Minimum Y is not a multiple of the vertical cell size.
    #[error("min_y {min_y} is not a multiple of the vertical cell size {cell}")]
    MinYNotCellAligned {
        /// Configured minimum Y.
        min_y: i32,
        /// Configured vertical cell size.
        cell: u32,
    },
    /// Horizontal cell size must evenly divide a 16-block chunk.
    #[error("horizontal cell size {cell} does not divide 16")]
    HorizontalCellNotChunkAligned {
        /// Configured horizontal cell size.
        cell: u32,
    },
    /// `min_y + height` exceeds the absolute world ceiling.
    #[error("world top {top} exceeds the absolute ceiling {ceiling}")]
    WorldCeilingExceeded {
        /// Configured `min_y + height`.
        top: i32,
        /// The fixed ceiling.
        ceiling: i32,
    },
    /// Cell sizes must be nonzero.
    #[error("cell sizes must be nonzero")]
    ZeroCellSize,
}

impl GeneratorSettings {
    /// Validates the vertical bounds against the cell grid and the absolute
    /// ceiling.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let shape = &self.shape;
        if shape.vertical_cell_size == 0 || shape.horizontal_cell_size == 0 {
            return Err(SettingsError::ZeroCellSize);
        }
        if shape.height % shape.vertical_cell_size != 0 {
            return Err(SettingsError::HeightNotCellAligned {
                height: shape.height,
                cell: shape.vertical_cell_size,
            });
        }
        if shape.min_y.rem_euclid(shape.vertical_cell_size as i32) != 0 {
            return Err(SettingsError::MinYNotCellAligned {
                min_y: shape.min_y,
                cell: shape.vertical_cell_size,
            });
        }
        if 16 % shape.horizontal_cell_size != 0 {
            return Err(SettingsError::HorizontalCellNotChunkAligned {
                cell: shape.horizontal_cell_size,
            });
        }
        let top = shape.max_y();
        if top > ABSOLUTE_MAX_Y {
            return Err(SettingsError::WorldCeilingExceeded {
                top,
                ceiling: ABSOLUTE_MAX_Y,
            });
        }
        Ok(())
    }

    /// An overworld-like default over the given material set.
    #[must_use]
    pub fn overworld(materials: Materials, shallow_vein: VeinFamily, deep_vein: VeinFamily) -> Self {
        let shape = GenerationShape::overworld();
        let max_y = shape.max_y();
        Self {
            top_slide: Slide {
                target: -0.078125,
                from_y: max_y - 80,
                to_y: max_y - 16,
            },
            bottom_slide: Slide {
                target: 0.1171875,
                from_y: shape.min_y + 40,
                to_y: shape.min_y,
            },
            shape,
            body_noise: BodyNoiseSettings::Blended(NoiseScaling::overworld()),
            density_factor: 1.0,
            density_offset: -0.51875,
            sea_level: 63,
            aquifers_enabled: true,
            noise_caves_enabled: true,
            ore_veins_enabled: true,
            noodle_caves_enabled: true,
            deep_stone: DeepStoneSettings {
                enabled: true,
                low_y: 0,
                high_y: 8,
            },
            bedrock: BedrockSettings {
                floor_depth: 5,
                roof_depth: 0,
            },
            materials,
            shallow_vein,
            deep_vein,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn vein(base: u16) -> VeinFamily {
        VeinFamily {
            ore: MaterialId(base),
            deep_ore: MaterialId(base + 1),
            raw_ore: MaterialId(base + 2),
            filler: MaterialId(base + 3),
            min_y: 0,
            max_y: 50,
        }
    }

    fn overworld() -> GeneratorSettings {
        GeneratorSettings::overworld(materials(), vein(10), vein(20))
    }

    #[test]
    fn test_overworld_valid() {
        assert_eq!(overworld().validate(), Ok(()));
    }

    #[test]
    fn test_unaligned_height_rejected() {
        let mut settings = overworld();
        settings.shape.height = 383;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::HeightNotCellAligned { .. })
        ));
    }

    #[test]
    fn test_unaligned_min_y_rejected() {
        let mut settings = overworld();
        settings.shape.min_y = -63;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::MinYNotCellAligned { .. })
        ));
    }

    #[test]
    fn test_ceiling_overflow_rejected() {
        let mut settings = overworld();
        settings.shape.min_y = 0;
        settings.shape.height = 2040;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::WorldCeilingExceeded { .. })
        ));
    }

    #[test]
    fn test_bad_horizontal_cell_rejected() {
        let mut settings = overworld();
        settings.shape.horizontal_cell_size = 5;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::HorizontalCellNotChunkAligned { .. })
        ));
    }
}

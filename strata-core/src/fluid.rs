//! Fluid levels and the global fluid picker.

use enum_dispatch::enum_dispatch;

use crate::material::MaterialId;

/// A fluid column: a fluid type standing up to (exclusive) a surface level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FluidLevel {
    max_y_exclusive: i32,
    fluid: MaterialId,
}

impl FluidLevel {
    /// Creates a fluid level with the given exclusive surface Y.
    #[must_use]
    pub const fn new(max_y_exclusive: i32, fluid: MaterialId) -> Self {
        Self {
            max_y_exclusive,
            fluid,
        }
    }

    /// First Y above the fluid surface.
    #[inline]
    #[must_use]
    pub const fn max_y_exclusive(&self) -> i32 {
        self.max_y_exclusive
    }

    /// The fluid material.
    #[inline]
    #[must_use]
    pub const fn fluid(&self) -> MaterialId {
        self.fluid
    }

    /// Fluid at or below the surface, air above it.
    #[inline]
    #[must_use]
    pub fn material_at(&self, y: i32, air: MaterialId) -> MaterialId {
        if y < self.max_y_exclusive {
            self.fluid
        } else {
            air
        }
    }
}

/// Global fluid decision, before any aquifer-local adjustment.
#[enum_dispatch]
pub trait FluidPickerImpl {
    /// The fluid level governing the given position.
    fn fluid_level(&self, x: i32, y: i32, z: i32) -> FluidLevel;
}

/// Fluid picker variants.
#[enum_dispatch(FluidPickerImpl)]
#[derive(Debug, Clone)]
pub enum FluidPicker {
    /// Sea-level surface fluid over a deep floor fluid.
    Standard(StandardFluidPicker),
}

/// Surface fluid above `floor_top_y`, floor fluid strictly below it.
///
/// With the floor level at `min_y + 10`, every cell in the bottom ten
/// layers of the world resolves to the floor fluid no matter what the
/// aquifer sites say.
#[derive(Debug, Clone)]
pub struct StandardFluidPicker {
    surface: FluidLevel,
    floor: FluidLevel,
    floor_top_y: i32,
}

impl StandardFluidPicker {
    /// Creates the standard two-layer picker.
    #[must_use]
    pub const fn new(surface: FluidLevel, floor: FluidLevel, floor_top_y: i32) -> Self {
        Self {
            surface,
            floor,
            floor_top_y,
        }
    }
}

impl FluidPickerImpl for StandardFluidPicker {
    fn fluid_level(&self, _x: i32, y: i32, _z: i32) -> FluidLevel {
        if y < self.floor_top_y {
            self.floor.clone()
        } else {
            self.surface.clone()
        }
    }
}

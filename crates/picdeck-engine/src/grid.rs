//! The simulation grid.

use picdeck_core::render::encode;
use picdeck_core::{check, RenderContext, RenderError, RenderedObject, ValidationError, Value};
use serde::Serialize;

/// Field and particle boundary condition of one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryCondition {
    /// Absorbing fields, particles leave the volume.
    Open,
    /// Periodic fields and particles.
    Periodic,
}

/// Cell edge length of a supercell, in cells, used when none is given.
pub const DEFAULT_SUPER_CELL_SIZE: [u32; 3] = [8, 8, 4];

/// Cartesian 3D grid, distributed over a block of devices.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Grid3D {
    cell_size_si: [f64; 3],
    cell_count: [u32; 3],
    boundary_condition: [BoundaryCondition; 3],
    gpu_count: [u32; 3],
    super_cell_size: [u32; 3],
}

impl Grid3D {
    /// Grid of `cell_count` cells of size `cell_size_si` (m), open on all
    /// sides, on a single device.
    pub fn new(cell_size_si: [f64; 3], cell_count: [u32; 3]) -> Result<Self, ValidationError> {
        let grid = Self {
            cell_size_si,
            cell_count,
            boundary_condition: [BoundaryCondition::Open; 3],
            gpu_count: [1; 3],
            super_cell_size: DEFAULT_SUPER_CELL_SIZE,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Replace the per-axis boundary conditions.
    pub fn with_boundary_condition(mut self, boundary: [BoundaryCondition; 3]) -> Self {
        self.boundary_condition = boundary;
        self
    }

    /// Split the grid over `gpu_count` devices per axis.
    pub fn with_gpu_count(mut self, gpu_count: [u32; 3]) -> Result<Self, ValidationError> {
        self.gpu_count = gpu_count;
        self.validate()?;
        Ok(self)
    }

    /// Replace the supercell size.
    pub fn with_super_cell_size(mut self, super_cell_size: [u32; 3]) -> Result<Self, ValidationError> {
        self.super_cell_size = super_cell_size;
        self.validate()?;
        Ok(self)
    }

    /// Check cell sizes and that every device receives a whole number of
    /// supercells.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (axis, name) in ["x", "y", "z"].iter().enumerate() {
            check::positive(&format!("cell_size_si.{name}"), self.cell_size_si[axis])?;
            let cells = self.cell_count[axis];
            let gpus = self.gpu_count[axis];
            let sc = self.super_cell_size[axis];
            if cells == 0 || gpus == 0 || sc == 0 {
                return Err(ValidationError::invalid(
                    format!("cell_count.{name}"),
                    "cell, device and supercell counts must be at least 1",
                ));
            }
            if cells % gpus != 0 || (cells / gpus) % sc != 0 {
                return Err(ValidationError::invalid(
                    format!("cell_count.{name}"),
                    format!(
                        "{cells} cells over {gpus} devices is not a multiple of the supercell size {sc}"
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Cell edge lengths, m.
    pub fn cell_size_si(&self) -> [f64; 3] {
        self.cell_size_si
    }

    /// Cells per axis.
    pub fn cell_count(&self) -> [u32; 3] {
        self.cell_count
    }

    /// Physical extent, m.
    pub fn extent_si(&self) -> [f64; 3] {
        [0, 1, 2].map(|i| self.cell_size_si[i] * f64::from(self.cell_count[i]))
    }

    /// Per-axis boundary conditions.
    pub fn boundary_condition(&self) -> [BoundaryCondition; 3] {
        self.boundary_condition
    }
}

impl RenderedObject for Grid3D {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:grid"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        encode(self.schema_id(), self)
    }
}

//! Field solvers.

use picdeck_core::render::encode;
use picdeck_core::units::SPEED_OF_LIGHT;
use picdeck_core::{tagged_group, RenderContext, RenderError, RenderedObject, Value};
use serde::Serialize;
use serde_json::json;

use crate::grid::Grid3D;

/// Grid axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// x axis.
    X,
    /// y axis.
    Y,
    /// z axis.
    Z,
}

impl Axis {
    /// Index into per-axis arrays.
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Standard Yee finite-difference time-domain solver.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Yee;

impl RenderedObject for Yee {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:solver.yee"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        Ok(json!({}))
    }
}

/// Lehe solver, free of numerical Cherenkov radiation along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Lehe {
    /// Axis along which relativistic particles travel.
    pub cherenkov_free_direction: Axis,
}

impl RenderedObject for Lehe {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:solver.lehe"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        encode(self.schema_id(), self)
    }
}

tagged_group! {
    /// Maxwell solver of the simulation.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub enum Solver: "urn:picdeck:solver" {
        /// See [`Yee`].
        "yee" => Yee(Yee),
        /// See [`Lehe`].
        "lehe" => Lehe(Lehe),
    }
}

impl Solver {
    /// Largest stable time step on `grid`, s.
    ///
    /// Yee obeys the 3D Courant limit. Lehe is stable up to the cell
    /// crossing time along its Cherenkov-free direction, capped by the
    /// Courant limit of the remaining axes.
    pub fn max_time_step_si(&self, grid: &Grid3D) -> f64 {
        let d = grid.cell_size_si();
        let courant = 1.0 / (SPEED_OF_LIGHT * d.iter().map(|x| 1.0 / (x * x)).sum::<f64>().sqrt());
        match self {
            Self::Yee(_) => courant,
            Self::Lehe(l) => {
                let along = d[l.cherenkov_free_direction.index()] / SPEED_OF_LIGHT;
                along.max(courant)
            }
        }
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::Yee(Yee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picdeck_core::TaggedGroup;

    #[test]
    fn courant_limit_of_cubic_cells() {
        let grid = Grid3D::new([1e-7; 3], [8, 8, 4]).unwrap();
        let dt = Solver::default().max_time_step_si(&grid);
        let expected = 1e-7 / (SPEED_OF_LIGHT * 3f64.sqrt());
        assert!((dt - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn lehe_allows_longer_steps_than_yee() {
        let grid = Grid3D::new([1e-7, 5e-8, 1e-7], [8, 8, 4]).unwrap();
        let lehe = Solver::from(Lehe {
            cherenkov_free_direction: Axis::Y,
        });
        assert!(lehe.max_time_step_si(&grid) >= Solver::default().max_time_step_si(&grid));
        assert_eq!(lehe.tag(), "lehe");
    }
}

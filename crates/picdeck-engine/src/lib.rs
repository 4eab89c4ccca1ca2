//! Simulation assembly and build pipeline for picdeck.
//!
//! A [`Simulation`] combines a [`Grid3D`], a [`Solver`], lasers, plugins
//! and the [`InitManager`](picdeck_init::InitManager) holding species.
//! [`Simulation::build`] turns it into one schema-validated mapping that a
//! [`RenderSink`] hands on to code generation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod grid;
pub mod laser;
pub mod plugin;
pub mod simulation;
pub mod sink;
pub mod solver;
pub mod timestep;

pub use config::{BuildConfig, BuildError, ConfigError};
pub use grid::{BoundaryCondition, Grid3D};
pub use laser::{Amplitude, GaussianLaser, GaussianLaserParams, PolarizationType};
pub use plugin::{
    Checkpoint, EnergyHistogram, MacroParticleCount, MomentumComponent, OpenPmd,
    OpenPmdExtension, PhaseSpace, Plugin,
};
pub use simulation::Simulation;
pub use sink::{JsonFileSink, MemorySink, RenderSink};
pub use solver::{Axis, Lehe, Solver, Yee};
pub use timestep::{StepRange, TimeStepSpec};

//! picdeck: declarative particle-in-cell simulation setups.
//!
//! This is the facade crate that re-exports the public API of the picdeck
//! sub-crates. A setup is declared as species, requirements and
//! diagnostics; building it resolves the requirements and renders one
//! schema-validated mapping for the downstream code generator.
//!
//! # Quick start
//!
//! ```rust
//! use picdeck::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let grid = Grid3D::new([1e-7, 1e-7, 1e-7], [32, 64, 32])?;
//! let solver = Solver::default();
//! let dt = solver.max_time_step_si(&grid) * 0.9;
//! let mut sim = Simulation::new(grid, solver, dt, 100)?;
//!
//! let init = sim.init_mut();
//! let electrons = init.add_particle_species(None, ParticleType::Electron)?;
//! let profile = DensityProfile::from(Uniform::new(1e24)?);
//! init.declare(&Placement::new(profile, 4, [electrons])?)?;
//!
//! let schemas = concat!(env!("CARGO_MANIFEST_DIR"), "/../../schemas");
//! let store = SchemaStore::load_dir(schemas)?;
//! let rendered = sim.build_with(&store, None)?;
//! assert_eq!(rendered["typical_ppc"], 4);
//! assert_eq!(rendered["species_initmanager"]["species"][0]["name"], "electron");
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `picdeck-core` | Rendering contract, tagged groups, validation helpers |
//! | [`schema`] | `picdeck-schema` | Schema store, validator, process-wide store |
//! | [`requirement`] | `picdeck-requirement` | Requirement model and resolution engine |
//! | [`species`] | `picdeck-species` | Species aggregate, constants, attributes, ionization |
//! | [`init`] | `picdeck-init` | Initialization manager, profiles, operations |
//! | [`engine`] | `picdeck-engine` | Grid, solver, lasers, plugins, build pipeline |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Rendering contract and shared helpers (`picdeck-core`).
///
/// [`core::RenderedObject`] is the trait every renderable value implements;
/// [`core::TaggedGroup`] covers closed sets of variants.
pub use picdeck_core as core;

/// Schema documents and validation (`picdeck-schema`).
///
/// Load a directory with [`schema::SchemaStore::load_dir`] or install a
/// process-wide store with [`schema::load_global_once`].
pub use picdeck_schema as schema;

/// Requirement model and resolution (`picdeck-requirement`).
pub use picdeck_requirement as requirement;

/// Species, constants, attributes and ionization models (`picdeck-species`).
pub use picdeck_species as species;

/// Initialization manager and operations (`picdeck-init`).
///
/// [`init::InitManager`] owns the species; declarations such as
/// [`init::Placement`] register their requirements on it.
pub use picdeck_init as init;

/// Simulation assembly and the build pipeline (`picdeck-engine`).
pub use picdeck_engine as engine;

/// Common imports for typical picdeck usage.
///
/// ```rust
/// use picdeck::prelude::*;
/// ```
pub mod prelude {
    // Rendering
    pub use picdeck_core::{RenderContext, RenderedObject, SchemaValidator, SideFileSink, SpeciesId};

    // Errors
    pub use picdeck_core::{RenderError, ValidationError};
    pub use picdeck_engine::BuildError;
    pub use picdeck_init::InitError;
    pub use picdeck_requirement::{RequirementConflict, ResolveError};
    pub use picdeck_schema::SchemaError;

    // Schemas
    pub use picdeck_schema::SchemaStore;

    // Species
    pub use picdeck_species::{Element, IonizationModel, ParticleType, SpeciesRef};

    // Initialization
    pub use picdeck_init::{
        ChargeState, DensityProfile, Drift, Foil, Gaussian, InitManager, Ionization,
        NotPlacedDeclaration, Placement, Temperature, Uniform,
    };

    // Engine
    pub use picdeck_engine::{
        Axis, BuildConfig, Grid3D, JsonFileSink, Plugin, RenderSink, Simulation, Solver,
        TimeStepSpec,
    };
}

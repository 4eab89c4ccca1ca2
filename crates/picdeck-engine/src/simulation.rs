//! [`Simulation`]: the top-level configuration object and build pipeline.
//!
//! Building seals the init manager, finalizes species and operations,
//! checks cross-object references, and renders everything into one
//! mapping validated against the simulation schema. Every nested object is
//! validated as it is rendered, so the first invalid node aborts the build.

use picdeck_core::render::render_list;
use picdeck_core::{
    check, RenderContext, RenderError, RenderedObject, SchemaValidator, SideFileSink,
    ValidationError, Value,
};
use picdeck_init::{InitManager, InitPlan, Operation};
use serde_json::json;

use crate::config::{BuildConfig, BuildError};
use crate::grid::Grid3D;
use crate::laser::GaussianLaser;
use crate::plugin::Plugin;
use crate::sink::RenderSink;
use crate::solver::Solver;

/// A complete PIC simulation setup.
#[derive(Debug)]
pub struct Simulation {
    delta_t_si: f64,
    time_steps: u32,
    grid: Grid3D,
    solver: Solver,
    lasers: Vec<GaussianLaser>,
    init: InitManager,
    plugins: Vec<Plugin>,
}

impl Simulation {
    /// Simulation running `time_steps` steps of `delta_t_si` seconds.
    ///
    /// The step must respect the stability limit of `solver` on `grid`.
    pub fn new(
        grid: Grid3D,
        solver: Solver,
        delta_t_si: f64,
        time_steps: u32,
    ) -> Result<Self, ValidationError> {
        check::positive("delta_t_si", delta_t_si)?;
        let limit = solver.max_time_step_si(&grid);
        if delta_t_si > limit {
            return Err(ValidationError::out_of_range(
                "delta_t_si",
                delta_t_si,
                format!("<= {limit:e} (stability limit of the solver)"),
            ));
        }
        Ok(Self {
            delta_t_si,
            time_steps,
            grid,
            solver,
            lasers: Vec::new(),
            init: InitManager::new(),
            plugins: Vec::new(),
        })
    }

    /// The init manager holding species and initialization operations.
    pub fn init(&self) -> &InitManager {
        &self.init
    }

    /// Mutable access for adding species and declarations.
    pub fn init_mut(&mut self) -> &mut InitManager {
        &mut self.init
    }

    /// Add a laser; lasers are rendered in insertion order.
    pub fn add_laser(&mut self, laser: GaussianLaser) {
        self.lasers.push(laser);
    }

    /// Add a plugin; plugins are rendered in insertion order.
    pub fn add_plugin(&mut self, plugin: impl Into<Plugin>) {
        self.plugins.push(plugin.into());
    }

    /// Grid.
    pub fn grid(&self) -> &Grid3D {
        &self.grid
    }

    /// Time step, s.
    pub fn delta_t_si(&self) -> f64 {
        self.delta_t_si
    }

    /// Seal, finalize and render against `ctx`.
    ///
    /// Sealing is permanent: afterwards no species or declarations can be
    /// added, but the simulation can be rendered again.
    pub fn render_with(&mut self, ctx: &RenderContext<'_>) -> Result<Value, BuildError> {
        self.init.seal();
        let plan = self.init.finalize()?;
        self.check_plugin_species()?;
        let rendered = SimulationView { sim: &*self, plan: &plan }.render(ctx)?;
        tracing::info!(
            species = plan.species().len(),
            lasers = self.lasers.len(),
            plugins = self.plugins.len(),
            "simulation rendered"
        );
        Ok(rendered)
    }

    /// Render against `validator`, writing side files into `side_files`
    /// if given.
    pub fn build_with(
        &mut self,
        validator: &dyn SchemaValidator,
        side_files: Option<&SideFileSink>,
    ) -> Result<Value, BuildError> {
        let ctx = RenderContext::new(validator);
        let ctx = match side_files {
            Some(sink) => ctx.with_side_files(sink),
            None => ctx,
        };
        self.render_with(&ctx)
    }

    /// Validate `config`, obtain the schema store and render.
    ///
    /// With `config.schema_dir` set, the process-wide store is loaded from
    /// it unless a store is already installed, in which case the installed
    /// store is used.
    pub fn build(&mut self, config: &BuildConfig) -> Result<Value, BuildError> {
        config.validate()?;
        let store = match &config.schema_dir {
            Some(dir) => picdeck_schema::load_global_once(dir)?,
            None => picdeck_schema::global()?,
        };
        let side_files = SideFileSink::new(&config.side_file_dir);
        self.build_with(&*store, Some(&side_files))
    }

    /// [`build`](Self::build) and hand the mapping to `sink` under
    /// `config.output_file_name`.
    pub fn write(
        &mut self,
        sink: &mut dyn RenderSink,
        config: &BuildConfig,
    ) -> Result<Value, BuildError> {
        let rendered = self.build(config)?;
        sink.accept(&config.output_file_name, &rendered)?;
        Ok(rendered)
    }

    fn check_plugin_species(&self) -> Result<(), BuildError> {
        for plugin in &self.plugins {
            let Some(species) = plugin.species() else {
                continue;
            };
            let known = self
                .init
                .species(species.id)
                .is_ok_and(|s| s.name() == species.name);
            if !known {
                return Err(BuildError::UnknownPluginSpecies {
                    plugin: picdeck_core::TaggedGroup::tag(plugin),
                    species: species.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A simulation together with its finalized init plan.
struct SimulationView<'a> {
    sim: &'a Simulation,
    plan: &'a InitPlan,
}

impl SimulationView<'_> {
    /// Largest particles-per-cell of any placement; at least one.
    fn typical_ppc(&self) -> u32 {
        self.plan
            .operations()
            .iter()
            .filter_map(|op| match op {
                Operation::SimpleDensity(d) => Some(d.ppc),
                _ => None,
            })
            .max()
            .unwrap_or(1)
    }
}

impl RenderedObject for SimulationView<'_> {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:simulation"
    }

    fn serialize(&self, ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        let sim = self.sim;
        Ok(json!({
            "delta_t_si": sim.delta_t_si,
            "time_steps": sim.time_steps,
            "typical_ppc": self.typical_ppc(),
            "grid": sim.grid.render(ctx)?,
            "solver": sim.solver.render(ctx)?,
            "laser": render_list(&sim.lasers, ctx)?,
            "species_initmanager": self.plan.render(ctx)?,
            "plugins": render_list(&sim.plugins, ctx)?,
        }))
    }
}

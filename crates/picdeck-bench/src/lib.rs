//! Benchmark profiles for the picdeck build pipeline.
//!
//! - [`wakefield_profile`]: laser wakefield in nitrogen, `ions` ion species
//!   ionizing into one shared electron species
//! - [`ion_names`]: names used for the ion species of a profile

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use picdeck_engine::{
    Amplitude, Axis, EnergyHistogram, GaussianLaser, GaussianLaserParams, Grid3D,
    MomentumComponent, PhaseSpace, Simulation, Solver, TimeStepSpec,
};
use picdeck_init::{
    ChargeState, DensityProfile, InitError, Ionization, NotPlacedDeclaration, Placement, Uniform,
};
use picdeck_species::{Bsi, Element, IonizationModel, ParticleType, ThomasFermi};

/// Names of the ion species created by [`wakefield_profile`].
pub fn ion_names(ions: usize) -> Vec<String> {
    (0..ions).map(|i| format!("N{i}")).collect()
}

/// Build a wakefield setup with `ions` nitrogen species.
///
/// All ions share one uniform placement (so resolution has to merge the
/// placement intents) and ionize into the same electron species with two
/// models each. Grid: 192x2048x192 cells, Yee solver at 99% of the Courant
/// limit, one Gaussian pulse and two electron diagnostics.
pub fn wakefield_profile(ions: usize) -> Result<Simulation, InitError> {
    let grid = Grid3D::new([1.776e-7, 4.43e-8, 1.776e-7], [192, 2048, 192])?;
    let solver = Solver::default();
    let dt = solver.max_time_step_si(&grid) * 0.99;
    let mut sim = Simulation::new(grid, solver, dt, 4000)?;

    sim.add_laser(GaussianLaser::new(GaussianLaserParams::along_y(
        0.8e-6,
        5e-6,
        5e-15,
        [1.7e-5, 4e-5, 1.7e-5],
        Amplitude::A0(8.0),
    ))?);

    let init = sim.init_mut();
    let electron_id = init.add_particle_species(None, ParticleType::Electron)?;
    let electrons = init.species(electron_id)?.reference();
    init.declare(&NotPlacedDeclaration {
        species: electron_id,
    })?;

    let profile = DensityProfile::from(Uniform::new(1e25)?);
    for name in ion_names(ions) {
        let ion = init.add_particle_species(Some(&name), ParticleType::Element(Element::N))?;
        init.declare(&Placement::new(profile.clone(), 2, [ion])?)?;
        init.declare(&ChargeState {
            species: ion,
            charge_state: 2,
        })?;
        for model in [
            IonizationModel::from(Bsi::new(electrons.clone(), None)?),
            IonizationModel::from(ThomasFermi::new(electrons.clone(), None)?),
        ] {
            init.declare(&Ionization { ion, model })?;
        }
    }

    let period = TimeStepSpec::every(100)?;
    sim.add_plugin(PhaseSpace::new(
        electrons.clone(),
        period.clone(),
        Axis::Y,
        MomentumComponent::Py,
        -1.0,
        1.0,
    )?);
    sim.add_plugin(EnergyHistogram::new(electrons, period, 1024, 0.0, 1e3)?);
    Ok(sim)
}

//! Full builds rendered against the shipped schemas.

use picdeck_core::{Map, RenderError, SideFileSink, ValidationError};
use picdeck_engine::{
    Amplitude, Axis, BuildConfig, BuildError, Checkpoint, ConfigError, EnergyHistogram,
    GaussianLaser, GaussianLaserParams, Grid3D, MacroParticleCount, MemorySink, MomentumComponent,
    OpenPmd, OpenPmdExtension, PhaseSpace, Simulation, Solver, TimeStepSpec,
};
use picdeck_init::{ChargeState, DensityProfile, Ionization, NotPlacedDeclaration, Placement, Uniform};
use picdeck_schema::SchemaStore;
use picdeck_species::{Bsi, Element, IonizationModel, ParticleType, SpeciesRef};
use picdeck_test_utils::fixtures::{schema_dir, scratch_dir, shipped_store};
use serde_json::json;

fn every(n: u64) -> TimeStepSpec {
    TimeStepSpec::every(n).unwrap()
}

/// Laser-ionized nitrogen gas: the usual wakefield starter setup.
fn wakefield() -> (Simulation, SpeciesRef, SpeciesRef) {
    let grid = Grid3D::new([1.776e-7, 4.43e-8, 1.776e-7], [192, 2048, 192]).unwrap();
    let solver = Solver::default();
    let dt = solver.max_time_step_si(&grid) * 0.99;
    let mut sim = Simulation::new(grid, solver, dt, 1000).unwrap();

    let laser = GaussianLaser::new(GaussianLaserParams::along_y(
        0.8e-6,
        5e-6,
        5e-15,
        [1.7e-5, 4e-5, 1.7e-5],
        Amplitude::A0(8.0),
    ))
    .unwrap();
    sim.add_laser(laser);

    let init = sim.init_mut();
    let n = init
        .add_particle_species(None, ParticleType::Element(Element::N))
        .unwrap();
    let e = init.add_particle_species(None, ParticleType::Electron).unwrap();
    let electrons = init.species(e).unwrap().reference();
    let nitrogen = init.species(n).unwrap().reference();
    let profile = DensityProfile::from(Uniform::new(1e25).unwrap());
    init.declare(&Placement::new(profile, 2, [n]).unwrap()).unwrap();
    init.declare(&NotPlacedDeclaration { species: e }).unwrap();
    init.declare(&ChargeState {
        species: n,
        charge_state: 5,
    })
    .unwrap();
    let model = IonizationModel::from(Bsi::new(electrons.clone(), None).unwrap());
    init.declare(&Ionization { ion: n, model }).unwrap();

    sim.add_plugin(
        PhaseSpace::new(electrons.clone(), every(100), Axis::Y, MomentumComponent::Py, -1.0, 1.0)
            .unwrap(),
    );
    sim.add_plugin(EnergyHistogram::new(electrons.clone(), every(100), 1024, 0.0, 1e3).unwrap());
    sim.add_plugin(MacroParticleCount {
        species: nitrogen.clone(),
        period: every(10),
    });
    sim.add_plugin(Checkpoint::new(Some(every(500)), None, None).unwrap());
    (sim, electrons, nitrogen)
}

#[test]
fn phase_space_with_inverted_bounds_is_rejected_before_rendering() {
    let (_, electrons, _) = wakefield();
    match PhaseSpace::new(electrons, every(10), Axis::X, MomentumComponent::Px, 2.0, 1.0) {
        Err(ValidationError::InvalidArgument { parameter, .. }) => {
            assert_eq!(parameter, "min_momentum");
        }
        other => panic!("expected InvalidArgument, got {other:?}"),
    }
}

#[test]
fn full_build_validates_against_shipped_schemas() {
    let (mut sim, _, _) = wakefield();
    let store = shipped_store();
    let rendered = sim.build_with(&store, None).unwrap();

    assert_eq!(rendered["time_steps"], json!(1000));
    assert_eq!(rendered["typical_ppc"], json!(2));
    assert_eq!(rendered["solver"]["typeID"]["yee"], json!(true));
    assert_eq!(rendered["laser"].as_array().unwrap().len(), 1);
    assert_eq!(rendered["plugins"].as_array().unwrap().len(), 4);
    assert_eq!(rendered["plugins"][0]["typeID"]["phase_space"], json!(true));
    assert_eq!(rendered["plugins"][0]["data"]["period"]["specs"][0]["step"], json!(100));

    let species = rendered["species_initmanager"]["species"].as_array().unwrap();
    assert_eq!(species[0]["name"], json!("electron"));
    assert_eq!(species[1]["name"], json!("N"));
}

#[test]
fn building_twice_yields_the_same_mapping() {
    let (mut sim, _, _) = wakefield();
    let store = shipped_store();
    let first = sim.build_with(&store, None).unwrap();
    let second = sim.build_with(&store, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn sealed_after_build() {
    let (mut sim, _, _) = wakefield();
    sim.build_with(&shipped_store(), None).unwrap();
    assert!(sim.init().is_sealed());
    assert!(sim.init_mut().add_species("late").is_err());
}

#[test]
fn missing_schema_fails_the_build() {
    let (mut sim, _, _) = wakefield();
    match sim.build_with(&SchemaStore::new(), None) {
        Err(BuildError::Render(RenderError::SchemaNotFound { .. })) => {}
        other => panic!("expected SchemaNotFound, got {other:?}"),
    }
}

#[test]
fn openpmd_backend_config_goes_to_a_side_file() {
    let (mut sim, _, _) = wakefield();
    let mut backend = Map::new();
    backend.insert("adios2".to_string(), json!({"engine": {"type": "bp4"}}));
    sim.add_plugin(
        OpenPmd::new(every(200), "simData", OpenPmdExtension::Bp)
            .unwrap()
            .with_backend_config(backend),
    );

    let dir = scratch_dir("openpmd");
    let side_files = SideFileSink::new(&dir);
    let rendered = sim.build_with(&shipped_store(), Some(&side_files)).unwrap();

    let openpmd = &rendered["plugins"][4]["data"];
    assert_eq!(openpmd["config_file"], json!("openPMD_config_simData.json"));
    let written = std::fs::read_to_string(dir.join("openPMD_config_simData.json")).unwrap();
    let written: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(written["adios2"]["engine"]["type"], json!("bp4"));

    // The mapping does not depend on whether the side file was written.
    let (mut again, _, _) = wakefield();
    let mut backend = Map::new();
    backend.insert("adios2".to_string(), json!({"engine": {"type": "bp4"}}));
    again.add_plugin(
        OpenPmd::new(every(200), "simData", OpenPmdExtension::Bp)
            .unwrap()
            .with_backend_config(backend),
    );
    assert_eq!(again.build_with(&shipped_store(), None).unwrap(), rendered);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn plugin_on_foreign_species_is_rejected() {
    let (mut sim, _, _) = wakefield();
    let stranger = SpeciesRef {
        id: picdeck_core::SpeciesId(7),
        name: "stranger".to_string(),
    };
    sim.add_plugin(MacroParticleCount {
        species: stranger,
        period: every(1),
    });
    match sim.build_with(&shipped_store(), None) {
        Err(BuildError::UnknownPluginSpecies { plugin, species }) => {
            assert_eq!(plugin, "macro_particle_count");
            assert_eq!(species, "stranger");
        }
        other => panic!("expected UnknownPluginSpecies, got {other:?}"),
    }
}

#[test]
fn write_hands_the_mapping_to_the_sink() {
    let (mut sim, _, _) = wakefield();
    let config = BuildConfig {
        schema_dir: Some(schema_dir()),
        side_file_dir: scratch_dir("write"),
        output_file_name: "wakefield.json".to_string(),
    };
    let mut sink = MemorySink::new();
    let rendered = sim.write(&mut sink, &config).unwrap();
    assert_eq!(sink.outputs().len(), 1);
    assert_eq!(sink.outputs()[0].0, "wakefield.json");
    assert_eq!(sink.last(), Some(&rendered));
}

#[test]
fn invalid_config_is_reported_before_loading_schemas() {
    let (mut sim, _, _) = wakefield();
    let config = BuildConfig {
        output_file_name: "out/sim.json".to_string(),
        ..BuildConfig::default()
    };
    assert!(matches!(
        sim.build(&config),
        Err(BuildError::Config(ConfigError::InvalidFileName { .. }))
    ));
    assert!(!sim.init().is_sealed());
}

//! End-to-end initialization scenarios rendered against the shipped schemas.

use picdeck_core::{RenderContext, RenderedObject, SpeciesId};
use picdeck_init::{
    ChargeState, DensityProfile, Drift, Foil, InitError, InitManager, Ionization,
    NotPlacedDeclaration, Operation, Placement, Temperature, Uniform,
};
use picdeck_requirement::ResolveError;
use picdeck_species::{Bsi, Element, IonizationModel, ParticleType, SpeciesRef, ThomasFermi};
use picdeck_test_utils::fixtures::shipped_store;
use serde_json::json;

fn uniform(density: f64) -> DensityProfile {
    DensityProfile::from(Uniform::new(density).unwrap())
}

fn bsi(manager: &InitManager, electrons: SpeciesId) -> IonizationModel {
    let electrons = manager.species(electrons).unwrap().reference();
    IonizationModel::from(Bsi::new(electrons, None).unwrap())
}

/// Nitrogen registered before its ionization electrons; both placed.
fn ionized_nitrogen() -> (InitManager, SpeciesId, SpeciesId) {
    let mut m = InitManager::new();
    let n = m
        .add_particle_species(None, ParticleType::Element(Element::N))
        .unwrap();
    let e = m.add_particle_species(None, ParticleType::Electron).unwrap();
    let model = bsi(&m, e);
    m.declare(&Placement::new(uniform(1e25), 2, [n]).unwrap()).unwrap();
    m.declare(&NotPlacedDeclaration { species: e }).unwrap();
    m.declare(&ChargeState {
        species: n,
        charge_state: 2,
    })
    .unwrap();
    m.declare(&Ionization { ion: n, model }).unwrap();
    (m, n, e)
}

#[test]
fn uniform_profile_renders_tagged_wrapper() {
    let store = shipped_store();
    let ctx = RenderContext::new(&store);
    let rendered = uniform(42.17).render(&ctx).unwrap();
    assert_eq!(
        rendered,
        json!({
            "typeID": {
                "uniform": true,
                "foil": false,
                "gaussian": false,
                "cylinder": false,
                "free_formula": false,
            },
            "data": { "density_si": 42.17 },
        })
    );
}

#[test]
fn foil_without_ramps_renders_nulls() {
    let store = shipped_store();
    let ctx = RenderContext::new(&store);
    let foil = DensityProfile::from(Foil {
        density_si: 1e27,
        y_value_front_foil_si: 1e-6,
        thickness_foil_si: 2e-6,
        pre_foil_plasma_ramp: None,
        post_foil_plasma_ramp: None,
    });
    let rendered = foil.render(&ctx).unwrap();
    assert_eq!(rendered["typeID"]["foil"], json!(true));
    assert_eq!(rendered["data"]["pre_foil_plasma_ramp"], json!(null));
}

#[test]
fn electrons_defined_before_the_ion_that_depends_on_them() {
    let (mut m, n, e) = ionized_nitrogen();
    assert!(m.species(n).unwrap().depends_on(m.species(e).unwrap()));
    assert!(!m.species(e).unwrap().depends_on(m.species(n).unwrap()));
    assert_eq!(m.definition_order().unwrap(), vec![e, n]);

    m.seal();
    let plan = m.finalize().unwrap();
    let names: Vec<&str> = plan.species().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["electron", "N"]);
}

#[test]
fn plan_renders_against_shipped_schemas() {
    let (mut m, _, _) = ionized_nitrogen();
    m.seal();
    let plan = m.finalize().unwrap();
    let store = shipped_store();
    let rendered = plan.render(&RenderContext::new(&store)).unwrap();

    let ops = &rendered["operations"];
    assert_eq!(ops["simple_density"].as_array().unwrap().len(), 1);
    assert_eq!(ops["simple_density"][0]["placed_species_initial"], json!("N"));
    assert_eq!(ops["simple_momentum"][0]["species"], json!("N"));
    assert_eq!(ops["set_charge_state"][0]["charge_state"], json!(2));
    assert_eq!(ops["not_placed"][0]["species"], json!("electron"));

    let ion = &rendered["species"][1];
    let models = &ion["constants"]["ground_state_ionization"]["ionization_model_list"];
    assert_eq!(models[0]["data"]["ionization_electron_species"], json!("electron"));
}

#[test]
fn ionization_without_charge_state_is_rejected() {
    let mut m = InitManager::new();
    let n = m
        .add_particle_species(None, ParticleType::Element(Element::N))
        .unwrap();
    let e = m.add_particle_species(None, ParticleType::Electron).unwrap();
    let model = bsi(&m, e);
    m.declare(&Placement::new(uniform(1e25), 2, [n, e]).unwrap()).unwrap();
    m.declare(&Ionization { ion: n, model }).unwrap();
    m.seal();
    match m.finalize() {
        Err(InitError::MissingChargeState { species }) => assert_eq!(species, "N"),
        other => panic!("expected MissingChargeState, got {other:?}"),
    }
}

#[test]
fn models_from_two_declarers_merge_on_the_ion() {
    let (mut m, n, e) = ionized_nitrogen();
    let electrons = m.species(e).unwrap().reference();
    let tf = IonizationModel::from(ThomasFermi::new(electrons, None).unwrap());
    m.declare(&Ionization { ion: n, model: tf }).unwrap();
    m.seal();
    let plan = m.finalize().unwrap();
    let ion = &plan.species()[1];
    match ion.constant("ground_state_ionization") {
        Some(picdeck_species::Constant::GroundStateIonization(gsi)) => {
            assert_eq!(gsi.models().len(), 2);
        }
        other => panic!("expected GroundStateIonization, got {other:?}"),
    }
}

#[test]
fn ionization_requires_ion_and_electrons() {
    let mut m = InitManager::new();
    let e = m.add_particle_species(None, ParticleType::Electron).unwrap();
    let p = m.add_particle_species(Some("proton"), ParticleType::Element(Element::H)).unwrap();
    let not_ion = Ionization {
        ion: e,
        model: bsi(&m, e),
    };
    assert!(matches!(m.declare(&not_ion), Err(InitError::Validation(_))));
    let wrong_target = Ionization {
        ion: p,
        model: bsi(&m, p),
    };
    assert!(matches!(m.declare(&wrong_target), Err(InitError::Validation(_))));
}

#[test]
fn ionization_electron_reference_must_match_by_name() {
    let mut m = InitManager::new();
    let n = m
        .add_particle_species(None, ParticleType::Element(Element::N))
        .unwrap();
    let e = m.add_particle_species(None, ParticleType::Electron).unwrap();
    let stale = SpeciesRef {
        id: e,
        name: "positrons".into(),
    };
    let model = IonizationModel::from(Bsi::new(stale, None).unwrap());
    let before = m.species(n).unwrap().requirements().len();
    match m.declare(&Ionization { ion: n, model }) {
        Err(InitError::Validation(err)) => {
            assert!(err.to_string().contains("'positrons'"), "{err}")
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert_eq!(m.species(n).unwrap().requirements().len(), before);
}

#[test]
fn charge_state_bounded_by_atomic_number() {
    let mut m = InitManager::new();
    let h = m
        .add_particle_species(None, ParticleType::Element(Element::H))
        .unwrap();
    let too_high = ChargeState {
        species: h,
        charge_state: 2,
    };
    assert!(matches!(m.declare(&too_high), Err(InitError::Validation(_))));
    assert!(m
        .declare(&ChargeState {
            species: h,
            charge_state: 1,
        })
        .is_ok());
}

#[test]
fn shared_placement_and_density_ratio() {
    let mut m = InitManager::new();
    let e = m.add_particle_species(None, ParticleType::Electron).unwrap();
    let h = m
        .add_particle_species(None, ParticleType::Element(Element::H))
        .unwrap();
    let placement = Placement::new(uniform(1e24), 4, [e, h])
        .unwrap()
        .with_density_ratio(h, 0.5)
        .unwrap()
        .with_temperature(Temperature::new(0.1).unwrap())
        .with_drift(Drift::new([0.0, 1.0, 0.0], 1.1).unwrap());
    m.declare(&placement).unwrap();
    m.declare(&ChargeState {
        species: h,
        charge_state: 1,
    })
    .unwrap();
    m.seal();
    let plan = m.finalize().unwrap();

    let density: Vec<&Operation> = plan.operations_of("simple_density").collect();
    match density.as_slice() {
        [Operation::SimpleDensity(op)] => assert_eq!(op.species.len(), 2),
        other => panic!("expected one SimpleDensity, got {other:?}"),
    }
    assert_eq!(plan.operations_of("simple_momentum").count(), 2);
    assert!(plan.species()[1].constant("density_ratio").is_some());
    assert!(plan.species()[0].constant("density_ratio").is_none());

    let store = shipped_store();
    let rendered = plan.render(&RenderContext::new(&store)).unwrap();
    let momentum = &rendered["operations"]["simple_momentum"][0];
    assert_eq!(momentum["temperature"]["temperature_kev"], json!(0.1));
    assert_eq!(momentum["drift"]["gamma"], json!(1.1));
}

#[test]
fn placing_twice_with_different_profiles_fails() {
    let mut m = InitManager::new();
    let e = m.add_particle_species(None, ParticleType::Electron).unwrap();
    m.declare(&Placement::new(uniform(1e24), 4, [e]).unwrap()).unwrap();
    m.declare(&Placement::new(uniform(2e24), 4, [e]).unwrap()).unwrap();
    m.seal();
    assert!(matches!(m.finalize(), Err(InitError::Operations(_))));
}

// ── Placements merged across a conflicting entry ──

fn conflict_reason(m: &InitManager) -> String {
    match m.finalize() {
        Err(InitError::Operations(ResolveError::Conflict(c))) => c.reason,
        other => panic!("expected an operation conflict, got {other:?}"),
    }
}

#[test]
fn merged_placement_still_conflicts_with_a_later_profile() {
    let mut m = InitManager::new();
    let a = m.add_particle_species(Some("a"), ParticleType::Electron).unwrap();
    let b = m.add_particle_species(Some("b"), ParticleType::Electron).unwrap();
    m.declare(&Placement::new(uniform(1e25), 2, [a]).unwrap()).unwrap();
    m.declare(&Placement::new(uniform(2e25), 2, [b]).unwrap()).unwrap();
    // Merges into the first placement, which never saw the second one.
    m.declare(&Placement::new(uniform(1e25), 2, [b]).unwrap()).unwrap();
    m.seal();
    let reason = conflict_reason(&m);
    assert!(reason.contains("'b'"), "{reason}");
    assert!(reason.contains("two different density profiles"), "{reason}");
}

#[test]
fn merged_placement_still_conflicts_with_not_placed() {
    let mut m = InitManager::new();
    let a = m.add_particle_species(Some("a"), ParticleType::Electron).unwrap();
    let b = m.add_particle_species(Some("b"), ParticleType::Electron).unwrap();
    m.declare(&Placement::new(uniform(1e25), 2, [a]).unwrap()).unwrap();
    m.declare(&NotPlacedDeclaration { species: b }).unwrap();
    m.declare(&Placement::new(uniform(1e25), 2, [b]).unwrap()).unwrap();
    m.seal();
    let reason = conflict_reason(&m);
    assert!(reason.contains("placed and marked as not placed"), "{reason}");
}

#[test]
fn three_compatible_placements_merge_into_one() {
    let mut m = InitManager::new();
    let ids: Vec<SpeciesId> = ["a", "b", "c"]
        .into_iter()
        .map(|name| m.add_particle_species(Some(name), ParticleType::Electron).unwrap())
        .collect();
    for id in &ids {
        m.declare(&Placement::new(uniform(1e25), 2, [*id]).unwrap()).unwrap();
    }
    m.seal();
    let plan = m.finalize().unwrap();
    let densities: Vec<_> = plan
        .operations()
        .iter()
        .filter_map(|op| match op {
            Operation::SimpleDensity(d) => Some(d),
            _ => None,
        })
        .collect();
    assert_eq!(densities.len(), 1);
    let placed: Vec<SpeciesId> = densities[0].species.iter().map(|s| s.id).collect();
    assert_eq!(placed, ids);
}

//! Delayed construction of initialization operations.

use picdeck_core::ValidationError;
use picdeck_requirement::{same_metadata, Category, DelayedConstruction, Requirement};
use picdeck_species::SpeciesRef;

use crate::momentum::{Drift, Temperature};
use crate::operation::{Operation, SetChargeState, SimpleDensity, SimpleMomentum};
use crate::profile::DensityProfile;

/// Places species with one profile. Intents with the same profile and
/// particles per cell merge into a single operation; a species may only be
/// placed by one profile.
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleDensityIntent {
    ppc: u32,
    profile: DensityProfile,
    species: Vec<SpeciesRef>,
}

impl SimpleDensityIntent {
    /// Place `species` with `profile` and `ppc` macro-particles per cell.
    pub fn new(
        ppc: u32,
        profile: DensityProfile,
        species: Vec<SpeciesRef>,
    ) -> Result<Self, ValidationError> {
        if ppc == 0 {
            return Err(ValidationError::out_of_range("ppc", 0.0, ">= 1"));
        }
        if species.is_empty() {
            return Err(ValidationError::invalid("species", "at least one species must be placed"));
        }
        profile.validate()?;
        Ok(Self {
            ppc,
            profile,
            species,
        })
    }

    /// Species placed so far, in placement order.
    pub fn species(&self) -> &[SpeciesRef] {
        &self.species
    }

    fn same_placement(&self, other: &Self) -> bool {
        self.ppc == other.ppc && self.profile == other.profile
    }
}

impl DelayedConstruction<Operation> for SimpleDensityIntent {
    fn target_type(&self) -> &'static str {
        "simple_density"
    }

    fn target_category(&self) -> Category {
        Category::Operation
    }

    fn construct(&self) -> Result<Operation, ValidationError> {
        Ok(Operation::SimpleDensity(SimpleDensity {
            ppc: self.ppc,
            profile: self.profile.clone(),
            species: self.species.clone(),
        }))
    }

    fn try_merge_with(&mut self, other: &dyn DelayedConstruction<Operation>) -> bool {
        let Some(other) = other.downcast_ref::<Self>() else {
            return false;
        };
        if !self.same_placement(other) {
            return false;
        }
        for s in &other.species {
            if !self.species.iter().any(|mine| mine.id == s.id) {
                self.species.push(s.clone());
            }
        }
        true
    }

    fn check_conflict(&self, other: &Requirement<Operation>) -> Result<(), String> {
        match other {
            Requirement::Delayed(d) => {
                let Some(o) = d.downcast_ref::<Self>() else {
                    return Ok(());
                };
                if self.same_placement(o) {
                    return Ok(());
                }
                match self
                    .species
                    .iter()
                    .find(|s| o.species.iter().any(|t| t.id == s.id))
                {
                    Some(s) => Err(format!(
                        "species '{}' is placed by two different density profiles",
                        s.name
                    )),
                    None => Ok(()),
                }
            }
            Requirement::Direct(Operation::NotPlaced(np)) => {
                if self.species.iter().any(|s| s.id == np.species.id) {
                    Err(format!(
                        "species '{}' is both placed and marked as not placed",
                        np.species.name
                    ))
                } else {
                    Ok(())
                }
            }
            Requirement::Direct(_) => Ok(()),
        }
    }

    fn clone_boxed(&self) -> Box<dyn DelayedConstruction<Operation>> {
        Box::new(self.clone())
    }
}

/// Momentum initialization of one species. Unique per species.
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleMomentumIntent {
    species: SpeciesRef,
    temperature: Option<Temperature>,
    drift: Option<Drift>,
}

impl SimpleMomentumIntent {
    /// Initialize `species` with an optional thermal spread and drift.
    pub fn new(species: SpeciesRef, temperature: Option<Temperature>, drift: Option<Drift>) -> Self {
        Self {
            species,
            temperature,
            drift,
        }
    }
}

impl DelayedConstruction<Operation> for SimpleMomentumIntent {
    fn target_type(&self) -> &'static str {
        "simple_momentum"
    }

    fn target_category(&self) -> Category {
        Category::Operation
    }

    fn must_be_unique(&self) -> bool {
        true
    }

    fn construct(&self) -> Result<Operation, ValidationError> {
        Ok(Operation::SimpleMomentum(SimpleMomentum {
            species: self.species.clone(),
            temperature: self.temperature.clone(),
            drift: self.drift.clone(),
        }))
    }

    fn is_same_as(&self, other: &dyn DelayedConstruction<Operation>) -> bool {
        same_metadata(self, other)
    }

    fn check_conflict(&self, other: &Requirement<Operation>) -> Result<(), String> {
        let Requirement::Delayed(d) = other else {
            return Ok(());
        };
        match d.downcast_ref::<Self>() {
            Some(o) if o.species.id == self.species.id && o != self => Err(format!(
                "species '{}' has two different momentum initializations",
                self.species.name
            )),
            _ => Ok(()),
        }
    }

    fn clone_boxed(&self) -> Box<dyn DelayedConstruction<Operation>> {
        Box::new(self.clone())
    }
}

/// Initial charge state of one ion species. Unique per species.
#[derive(Clone, Debug, PartialEq)]
pub struct SetChargeStateIntent {
    species: SpeciesRef,
    charge_state: u32,
}

impl SetChargeStateIntent {
    /// Set the charge state of `species`. Bounds against the element are
    /// checked by the declarer, which knows the particle type.
    pub fn new(species: SpeciesRef, charge_state: u32) -> Self {
        Self {
            species,
            charge_state,
        }
    }
}

impl DelayedConstruction<Operation> for SetChargeStateIntent {
    fn target_type(&self) -> &'static str {
        "set_charge_state"
    }

    fn target_category(&self) -> Category {
        Category::Operation
    }

    fn must_be_unique(&self) -> bool {
        true
    }

    fn construct(&self) -> Result<Operation, ValidationError> {
        Ok(Operation::SetChargeState(SetChargeState {
            species: self.species.clone(),
            charge_state: self.charge_state,
        }))
    }

    fn is_same_as(&self, other: &dyn DelayedConstruction<Operation>) -> bool {
        same_metadata(self, other)
    }

    fn check_conflict(&self, other: &Requirement<Operation>) -> Result<(), String> {
        let Requirement::Delayed(d) = other else {
            return Ok(());
        };
        match d.downcast_ref::<Self>() {
            Some(o) if o.species.id == self.species.id && o.charge_state != self.charge_state => {
                Err(format!(
                    "species '{}' has charge states {} and {}",
                    self.species.name, self.charge_state, o.charge_state
                ))
            }
            _ => Ok(()),
        }
    }

    fn clone_boxed(&self) -> Box<dyn DelayedConstruction<Operation>> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::NotPlaced;
    use crate::profile::Uniform;
    use picdeck_core::SpeciesId;
    use picdeck_requirement::{resolve, ResolveError};

    fn s(id: u32) -> SpeciesRef {
        SpeciesRef {
            id: SpeciesId(id),
            name: format!("s{id}"),
        }
    }

    fn uniform(density: f64) -> DensityProfile {
        DensityProfile::from(Uniform::new(density).unwrap())
    }

    fn density(ppc: u32, d: f64, species: &[u32]) -> Requirement<Operation> {
        let species = species.iter().map(|i| s(*i)).collect();
        Requirement::delayed(SimpleDensityIntent::new(ppc, uniform(d), species).unwrap())
    }

    const OPS: &[Category] = &[Category::Operation];

    #[test]
    fn constructor_rejects_empty_placements() {
        assert!(SimpleDensityIntent::new(0, uniform(1.0), vec![s(0)]).is_err());
        assert!(SimpleDensityIntent::new(2, uniform(1.0), vec![]).is_err());
    }

    #[test]
    fn same_profile_placements_merge() {
        let bag = vec![density(2, 1.0, &[0]), density(2, 1.0, &[1, 0])];
        match resolve(&bag, OPS).unwrap().as_slice() {
            [Operation::SimpleDensity(op)] => {
                let ids: Vec<u32> = op.species.iter().map(|s| s.id.0).collect();
                assert_eq!(ids, vec![0, 1]);
            }
            other => panic!("expected one SimpleDensity, got {other:?}"),
        }
    }

    #[test]
    fn different_profiles_for_distinct_species_coexist() {
        let bag = vec![density(2, 1.0, &[0]), density(2, 2.0, &[1])];
        assert_eq!(resolve(&bag, OPS).unwrap().len(), 2);
    }

    #[test]
    fn species_placed_twice_conflicts() {
        let bag = vec![density(2, 1.0, &[0]), density(4, 1.0, &[0])];
        match resolve(&bag, OPS) {
            Err(ResolveError::Conflict(c)) => assert!(c.reason.contains("'s0'"), "{c}"),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn placed_and_not_placed_conflict() {
        let bag = vec![NotPlaced { species: s(0) }.into(), density(2, 1.0, &[0])];
        assert!(matches!(resolve(&bag, OPS), Err(ResolveError::Conflict(_))));
    }

    #[test]
    fn momentum_duplicates_collapse_and_differences_conflict() {
        let cold = || Requirement::delayed(SimpleMomentumIntent::new(s(0), None, None));
        let hot = Requirement::delayed(SimpleMomentumIntent::new(
            s(0),
            Some(Temperature::new(1.0).unwrap()),
            None,
        ));
        assert_eq!(resolve(&[cold(), cold()], OPS).unwrap().len(), 1);
        assert!(resolve(&[cold(), hot], OPS).is_err());
    }

    #[test]
    fn charge_state_conflicts_per_species() {
        let cs = |id, q| Requirement::delayed(SetChargeStateIntent::new(s(id), q));
        assert_eq!(resolve(&[cs(0, 2), cs(0, 2), cs(1, 3)], OPS).unwrap().len(), 2);
        assert!(resolve(&[cs(0, 2), cs(0, 3)], OPS).is_err());
    }
}

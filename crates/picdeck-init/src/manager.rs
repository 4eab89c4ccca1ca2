//! [`InitManager`]: registry of species and the initialization operations
//! that act on them.

use picdeck_core::SpeciesId;
use picdeck_requirement::{Category, RequirementBag, RequirementConflict, ResolveError};
use picdeck_species::{Attribute, ParticleType, Species, SpeciesRequirement};

use crate::declare::Declarer;
use crate::error::InitError;
use crate::operation::{Operation, OperationRequirement};
use crate::plan::InitPlan;

/// Owns every species and collects the operations declarers require.
///
/// Lifecycle mirrors [`Species`]: declare, [`seal`](Self::seal), then
/// [`finalize`](Self::finalize). Species ids are handed out sequentially
/// and index the registry.
#[derive(Debug, Default)]
pub struct InitManager {
    species: Vec<Species>,
    operations: RequirementBag<Operation>,
    sealed: bool,
}

impl InitManager {
    /// An empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a species without a particle type.
    pub fn add_species(&mut self, name: &str) -> Result<SpeciesId, InitError> {
        let id = self.next_id()?;
        let species = Species::new(id, name)?;
        self.insert(species)
    }

    /// Register a species of `particle_type`, named after it unless `name`
    /// is given. Mass, charge and element properties are registered on it.
    pub fn add_particle_species(
        &mut self,
        name: Option<&str>,
        particle_type: ParticleType,
    ) -> Result<SpeciesId, InitError> {
        let id = self.next_id()?;
        let species = Species::with_particle_type(id, name, particle_type)?;
        self.insert(species)
    }

    fn next_id(&self) -> Result<SpeciesId, InitError> {
        if self.sealed {
            return Err(InitError::Sealed);
        }
        let raw = u32::try_from(self.species.len()).map_err(|_| {
            picdeck_core::ValidationError::invalid("species", "too many species")
        })?;
        Ok(SpeciesId(raw))
    }

    fn insert(&mut self, species: Species) -> Result<SpeciesId, InitError> {
        if self.species_by_name(species.name()).is_some() {
            return Err(InitError::DuplicateSpecies {
                name: species.name().to_string(),
            });
        }
        let id = species.id();
        tracing::debug!(species = species.name(), id = id.0, "species added");
        self.species.push(species);
        Ok(id)
    }

    /// Species by id.
    pub fn species(&self, id: SpeciesId) -> Result<&Species, InitError> {
        self.species
            .get(id.index())
            .ok_or(InitError::UnknownSpecies { id })
    }

    /// Species by name.
    pub fn species_by_name(&self, name: &str) -> Option<&Species> {
        self.species.iter().find(|s| s.name() == name)
    }

    /// Every species in registry order.
    pub fn all_species(&self) -> &[Species] {
        &self.species
    }

    /// Append requirements to one species.
    pub fn register_species_requirements<I>(
        &mut self,
        id: SpeciesId,
        requirements: I,
    ) -> Result<(), InitError>
    where
        I: IntoIterator<Item = SpeciesRequirement>,
    {
        if self.sealed {
            return Err(InitError::Sealed);
        }
        let species = self
            .species
            .get_mut(id.index())
            .ok_or(InitError::UnknownSpecies { id })?;
        species.register_requirements(requirements)?;
        Ok(())
    }

    /// Append one operation requirement.
    pub fn register_operation(
        &mut self,
        requirement: impl Into<OperationRequirement>,
    ) -> Result<(), InitError> {
        if self.sealed {
            return Err(InitError::Sealed);
        }
        self.operations.push(requirement);
        Ok(())
    }

    /// Let `declarer` register its requirements.
    pub fn declare<D: Declarer + ?Sized>(&mut self, declarer: &D) -> Result<(), InitError> {
        if self.sealed {
            return Err(InitError::Sealed);
        }
        declarer.declare(self)
    }

    /// Freeze the manager and every species. Idempotent.
    pub fn seal(&mut self) {
        for species in &mut self.species {
            species.seal();
        }
        self.sealed = true;
    }

    /// Whether [`seal`](Self::seal) was called.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Species ids ordered so that every species comes after the species
    /// it depends on.
    ///
    /// The sort is stable: among species whose dependencies are satisfied,
    /// the one registered first is emitted first.
    pub fn definition_order(&self) -> Result<Vec<SpeciesId>, InitError> {
        let deps: Vec<Vec<SpeciesId>> = self.species.iter().map(Species::dependencies).collect();
        for id in deps.iter().flatten() {
            self.species(*id)?;
        }

        let mut emitted = vec![false; self.species.len()];
        let mut order = Vec::with_capacity(self.species.len());
        while order.len() < self.species.len() {
            let next = (0..self.species.len())
                .find(|&i| !emitted[i] && deps[i].iter().all(|d| emitted[d.index()]));
            match next {
                Some(i) => {
                    emitted[i] = true;
                    order.push(self.species[i].id());
                }
                None => {
                    let species = self
                        .species
                        .iter()
                        .zip(&emitted)
                        .filter(|(_, done)| !**done)
                        .map(|(s, _)| s.name().to_string())
                        .collect();
                    return Err(InitError::DependencyCycle { species });
                }
            }
        }
        Ok(order)
    }

    /// Resolve every species and the operation list into an [`InitPlan`].
    ///
    /// Species are listed in [definition order](Self::definition_order).
    /// Every species must carry position and momentum, and a species that
    /// tracks bound electrons needs a charge-state operation.
    pub fn finalize(&self) -> Result<InitPlan, InitError> {
        if !self.sealed {
            return Err(InitError::NotSealed);
        }

        let mut species = Vec::with_capacity(self.species.len());
        for id in self.definition_order()? {
            let finalized = self.species(id)?.finalize()?;
            for attribute in [Attribute::Position, Attribute::Momentum] {
                if !finalized.has_attribute(attribute) {
                    return Err(InitError::MissingAttribute {
                        species: finalized.name().to_string(),
                        attribute: attribute.kind(),
                    });
                }
            }
            species.push(finalized.clone());
        }

        let operations = self.operations.resolve(&[Category::Operation])?;
        check_placements(&operations).map_err(ResolveError::Conflict)?;

        for s in self.species.iter() {
            let reference = s.reference();
            let tracks_bound = s
                .finalize()?
                .has_attribute(Attribute::BoundElectrons);
            let has_charge_state = operations
                .iter()
                .any(|op| matches!(op, Operation::SetChargeState(_)) && op.touches(&reference));
            if tracks_bound && !has_charge_state {
                return Err(InitError::MissingChargeState {
                    species: reference.name,
                });
            }
        }

        tracing::debug!(
            species = species.len(),
            operations = operations.len(),
            "initialization finalized"
        );
        Ok(InitPlan::new(species, operations))
    }
}

/// Every species is placed at most once and never both placed and marked
/// as not placed.
///
/// Pairwise checks during resolution only see the entries a merge target
/// is compared against, so the merged list is checked as a whole here.
fn check_placements(operations: &[Operation]) -> Result<(), RequirementConflict> {
    let mut placed: Vec<(SpeciesId, &Operation)> = Vec::new();
    for op in operations {
        let Operation::SimpleDensity(density) = op else {
            continue;
        };
        for s in &density.species {
            if let Some((_, earlier)) = placed.iter().find(|(id, _)| *id == s.id) {
                return Err(RequirementConflict {
                    lhs: format!("{op:?}"),
                    rhs: format!("{earlier:?}"),
                    reason: format!(
                        "species '{}' is placed by two different density profiles",
                        s.name
                    ),
                });
            }
            placed.push((s.id, op));
        }
    }
    for op in operations {
        let Operation::NotPlaced(not_placed) = op else {
            continue;
        };
        if let Some((_, density)) = placed.iter().find(|(id, _)| *id == not_placed.species.id) {
            return Err(RequirementConflict {
                lhs: format!("{op:?}"),
                rhs: format!("{density:?}"),
                reason: format!(
                    "species '{}' is both placed and marked as not placed",
                    not_placed.species.name
                ),
            });
        }
    }
    Ok(())
}

//! Declarers: user-facing setups that register requirements on species
//! and operations.
//!
//! A declarer never resolves anything. It records what it needs on the
//! [`InitManager`]; contradictions between declarers surface when the
//! manager is finalized.

use picdeck_core::{SpeciesId, ValidationError};
use picdeck_species::{
    Attribute, DensityRatio, DependsOn, GroundStateIonizationIntent, IonizationModel,
    ParticleType, SpeciesRequirement,
};

use crate::error::InitError;
use crate::intent::{SetChargeStateIntent, SimpleDensityIntent, SimpleMomentumIntent};
use crate::manager::InitManager;
use crate::momentum::{Drift, Temperature};
use crate::operation::{NotPlaced, OperationRequirement};
use crate::profile::DensityProfile;

/// Something that registers requirements on an [`InitManager`].
pub trait Declarer {
    /// Record this declarer's requirements.
    fn declare(&self, manager: &mut InitManager) -> Result<(), InitError>;
}

// ── Placement ──────────────────────────────────────────────────────

/// Place species with a density profile and give them a momentum
/// distribution.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    profile: DensityProfile,
    ppc: u32,
    species: Vec<SpeciesId>,
    ratios: Vec<(SpeciesId, DensityRatio)>,
    temperature: Option<Temperature>,
    drift: Option<Drift>,
}

impl Placement {
    /// Place `species` with `profile`, `ppc` macro-particles per cell.
    ///
    /// The profile is validated here.
    pub fn new(
        profile: DensityProfile,
        ppc: u32,
        species: impl IntoIterator<Item = SpeciesId>,
    ) -> Result<Self, ValidationError> {
        profile.validate()?;
        if ppc == 0 {
            return Err(ValidationError::out_of_range("ppc", 0.0, ">= 1"));
        }
        let mut unique: Vec<SpeciesId> = Vec::new();
        for id in species {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        if unique.is_empty() {
            return Err(ValidationError::invalid("species", "at least one species must be placed"));
        }
        Ok(Self {
            profile,
            ppc,
            species: unique,
            ratios: Vec::new(),
            temperature: None,
            drift: None,
        })
    }

    /// Scale the density of one placed species by `ratio`.
    pub fn with_density_ratio(mut self, species: SpeciesId, ratio: f64) -> Result<Self, ValidationError> {
        if !self.species.contains(&species) {
            return Err(ValidationError::invalid(
                "species",
                format!("species id {} is not part of this placement", species.0),
            ));
        }
        let ratio = DensityRatio::new(ratio)?;
        self.ratios.retain(|(id, _)| *id != species);
        self.ratios.push((species, ratio));
        Ok(self)
    }

    /// Give placed particles a thermal spread.
    pub fn with_temperature(mut self, temperature: Temperature) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Give placed particles a drift.
    pub fn with_drift(mut self, drift: Drift) -> Self {
        self.drift = Some(drift);
        self
    }
}

impl Declarer for Placement {
    fn declare(&self, manager: &mut InitManager) -> Result<(), InitError> {
        let refs = self
            .species
            .iter()
            .map(|id| manager.species(*id).map(|s| s.reference()))
            .collect::<Result<Vec<_>, _>>()?;

        let density = SimpleDensityIntent::new(self.ppc, self.profile.clone(), refs.clone())?;
        manager.register_operation(OperationRequirement::delayed(density))?;

        for species in refs {
            let mut requirements: Vec<SpeciesRequirement> = vec![
                Attribute::Position.into(),
                Attribute::Weighting.into(),
                Attribute::Momentum.into(),
            ];
            if let Some((_, ratio)) = self.ratios.iter().find(|(id, _)| *id == species.id) {
                requirements.push(ratio.clone().into());
            }
            manager.register_species_requirements(species.id, requirements)?;
            manager.register_operation(OperationRequirement::delayed(SimpleMomentumIntent::new(
                species,
                self.temperature.clone(),
                self.drift.clone(),
            )))?;
        }
        Ok(())
    }
}

// ── NotPlacedDeclaration ───────────────────────────────────────────

/// Declare a species that starts empty and is filled at runtime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NotPlacedDeclaration {
    /// The species.
    pub species: SpeciesId,
}

impl Declarer for NotPlacedDeclaration {
    fn declare(&self, manager: &mut InitManager) -> Result<(), InitError> {
        let species = manager.species(self.species)?.reference();
        manager.register_species_requirements(
            species.id,
            [
                SpeciesRequirement::from(Attribute::Position),
                Attribute::Weighting.into(),
                Attribute::Momentum.into(),
            ],
        )?;
        manager.register_operation(NotPlaced { species })
    }
}

// ── ChargeState ────────────────────────────────────────────────────

/// Initial charge state of an ion species.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChargeState {
    /// The ion species.
    pub species: SpeciesId,
    /// Number of removed electrons, at most the atomic number.
    pub charge_state: u32,
}

impl Declarer for ChargeState {
    fn declare(&self, manager: &mut InitManager) -> Result<(), InitError> {
        let species = manager.species(self.species)?;
        let Some(element) = species.particle_type().and_then(ParticleType::element) else {
            return Err(ValidationError::invalid(
                "species",
                format!("'{}' is not an ion; charge states need an element", species.name()),
            )
            .into());
        };
        if self.charge_state > element.atomic_number() {
            return Err(ValidationError::out_of_range(
                "charge_state",
                f64::from(self.charge_state),
                format!("<= {} (atomic number of {element})", element.atomic_number()),
            )
            .into());
        }
        let species = species.reference();
        manager.register_species_requirements(
            species.id,
            [SpeciesRequirement::from(Attribute::BoundElectrons)],
        )?;
        manager.register_operation(OperationRequirement::delayed(SetChargeStateIntent::new(
            species,
            self.charge_state,
        )))
    }
}

// ── Ionization ─────────────────────────────────────────────────────

/// Enable an ionization model on an ion species.
///
/// The ion then depends on the model's electron species, which must be
/// defined first.
#[derive(Clone, Debug, PartialEq)]
pub struct Ionization {
    /// The ion species.
    pub ion: SpeciesId,
    /// The model; names the electron species that receives freed electrons.
    pub model: IonizationModel,
}

impl Declarer for Ionization {
    fn declare(&self, manager: &mut InitManager) -> Result<(), InitError> {
        let ion = manager.species(self.ion)?;
        if ion.particle_type().and_then(ParticleType::element).is_none() {
            return Err(ValidationError::invalid(
                "ion",
                format!("'{}' is not an ion; ionization needs an element", ion.name()),
            )
            .into());
        }
        let ion = ion.reference();

        let electrons = self.model.ionization_electron_species().clone();
        let target = manager.species(electrons.id)?;
        if target.name() != electrons.name {
            return Err(ValidationError::invalid(
                "ionization_electron_species",
                format!(
                    "reference names '{}' but species {} is '{}'",
                    electrons.name,
                    electrons.id.0,
                    target.name()
                ),
            )
            .into());
        }
        if target.particle_type() != Some(ParticleType::Electron) {
            return Err(ValidationError::invalid(
                "ionization_electron_species",
                format!("'{}' is not an electron species", target.name()),
            )
            .into());
        }

        let models = GroundStateIonizationIntent::new([self.model.clone()])?;
        manager.register_species_requirements(
            ion.id,
            [
                SpeciesRequirement::delayed(models),
                SpeciesRequirement::from(DependsOn { species: electrons }),
                SpeciesRequirement::from(Attribute::BoundElectrons),
            ],
        )
    }
}

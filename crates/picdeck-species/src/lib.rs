//! Species for picdeck.
//!
//! A [`Species`] accumulates [`SpeciesRequirement`]s from independent
//! declarers (placements, ionization setups, charge-state initializers)
//! and, once sealed, resolves them into the constants and attributes that
//! end up in the generated simulation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod attribute;
pub mod constant;
pub mod element;
pub mod error;
pub mod intent;
pub mod ionization;
pub mod property;
pub mod species;

pub use attribute::Attribute;
pub use constant::{
    Charge, Constant, DensityRatio, DependsOn, ElementProperties, GroundStateIonization, Mass,
};
pub use element::{Element, ParticleType};
pub use error::SpeciesError;
pub use intent::GroundStateIonizationIntent;
pub use ionization::{
    AdkCircularPolarization, AdkLinearPolarization, Bsi, BsiEffectiveZ, BsiStarkShifted,
    IonizationCurrent, IonizationFamily, IonizationModel, Keldysh, ThomasFermi,
};
pub use property::{SpeciesProperty, SpeciesRequirement};
pub use species::{FinalizedSpecies, Species, SpeciesRef};

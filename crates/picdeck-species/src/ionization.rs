//! Ionization models.
//!
//! Every model names the species that receives the freed electrons. Models
//! are grouped into families; a species may combine models of different
//! families but never two different models of the same family.

use picdeck_core::{
    check_unsupported, tagged_group, RenderContext, RenderError, RenderedObject, TaggedGroup,
    ValidationError, Value,
};
use serde_json::json;

use crate::species::SpeciesRef;

/// Ionization current models. Only [`IonizationCurrent::None`] is
/// supported; any other value is rejected at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IonizationCurrent {
    /// No ionization current.
    None,
    /// Energy-conserving ionization current.
    EnergyConserving,
}

/// Physical mechanism a model describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IonizationFamily {
    /// Barrier-suppression (over-the-barrier) field ionization.
    BarrierSuppression,
    /// Tunnelling field ionization.
    Tunnelling,
    /// Collisional ionization.
    Collisional,
}

macro_rules! ionization_model {
    ($(#[$meta:meta])* $name:ident, $schema:literal, $picongpu:literal, $family:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name {
            ionization_electron_species: SpeciesRef,
        }

        impl $name {
            /// Model ionizing into `electrons`.
            ///
            /// `ionization_current` must be absent or [`IonizationCurrent::None`].
            pub fn new(
                electrons: SpeciesRef,
                ionization_current: Option<IonizationCurrent>,
            ) -> Result<Self, ValidationError> {
                check_unsupported(
                    "ionization_current",
                    ionization_current.as_ref(),
                    &IonizationCurrent::None,
                )?;
                Ok(Self {
                    ionization_electron_species: electrons,
                })
            }

            /// Species receiving the freed electrons.
            pub fn ionization_electron_species(&self) -> &SpeciesRef {
                &self.ionization_electron_species
            }

            /// Family this model belongs to.
            pub const FAMILY: IonizationFamily = IonizationFamily::$family;
        }

        impl RenderedObject for $name {
            fn schema_id(&self) -> &'static str {
                $schema
            }

            fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
                Ok(json!({
                    "picongpu_name": $picongpu,
                    "ionization_electron_species": self.ionization_electron_species.name,
                }))
            }
        }
    };
}

ionization_model!(
    /// Barrier-suppression ionization with the hydrogen-like formula.
    Bsi,
    "urn:picdeck:species.ionization.bsi",
    "BSI",
    BarrierSuppression
);
ionization_model!(
    /// Barrier-suppression ionization with an effective atomic number.
    BsiEffectiveZ,
    "urn:picdeck:species.ionization.bsi_effective_z",
    "BSIEffectiveZ",
    BarrierSuppression
);
ionization_model!(
    /// Barrier-suppression ionization including the Stark shift.
    BsiStarkShifted,
    "urn:picdeck:species.ionization.bsi_stark_shifted",
    "BSIStarkShifted",
    BarrierSuppression
);
ionization_model!(
    /// Ammosov-Delone-Krainov tunnelling for linear polarization.
    AdkLinearPolarization,
    "urn:picdeck:species.ionization.adk_linear_polarization",
    "ADKLinPol",
    Tunnelling
);
ionization_model!(
    /// Ammosov-Delone-Krainov tunnelling for circular polarization.
    AdkCircularPolarization,
    "urn:picdeck:species.ionization.adk_circular_polarization",
    "ADKCircPol",
    Tunnelling
);
ionization_model!(
    /// Keldysh tunnelling ionization.
    Keldysh,
    "urn:picdeck:species.ionization.keldysh",
    "Keldysh",
    Tunnelling
);
ionization_model!(
    /// Thomas-Fermi collisional ionization.
    ThomasFermi,
    "urn:picdeck:species.ionization.thomas_fermi",
    "ThomasFermi",
    Collisional
);

tagged_group! {
    /// Any ionization model.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub enum IonizationModel: "urn:picdeck:species.ionization.model" {
        /// See [`Bsi`].
        "bsi" => Bsi(Bsi),
        /// See [`BsiEffectiveZ`].
        "bsi_effective_z" => BsiEffectiveZ(BsiEffectiveZ),
        /// See [`BsiStarkShifted`].
        "bsi_stark_shifted" => BsiStarkShifted(BsiStarkShifted),
        /// See [`AdkLinearPolarization`].
        "adk_linear_polarization" => AdkLinearPolarization(AdkLinearPolarization),
        /// See [`AdkCircularPolarization`].
        "adk_circular_polarization" => AdkCircularPolarization(AdkCircularPolarization),
        /// See [`Keldysh`].
        "keldysh" => Keldysh(Keldysh),
        /// See [`ThomasFermi`].
        "thomas_fermi" => ThomasFermi(ThomasFermi),
    }
}

impl IonizationModel {
    /// Family of the active model.
    pub fn family(&self) -> IonizationFamily {
        match self {
            Self::Bsi(_) => Bsi::FAMILY,
            Self::BsiEffectiveZ(_) => BsiEffectiveZ::FAMILY,
            Self::BsiStarkShifted(_) => BsiStarkShifted::FAMILY,
            Self::AdkLinearPolarization(_) => AdkLinearPolarization::FAMILY,
            Self::AdkCircularPolarization(_) => AdkCircularPolarization::FAMILY,
            Self::Keldysh(_) => Keldysh::FAMILY,
            Self::ThomasFermi(_) => ThomasFermi::FAMILY,
        }
    }

    /// Species receiving the freed electrons.
    pub fn ionization_electron_species(&self) -> &SpeciesRef {
        match self {
            Self::Bsi(m) => m.ionization_electron_species(),
            Self::BsiEffectiveZ(m) => m.ionization_electron_species(),
            Self::BsiStarkShifted(m) => m.ionization_electron_species(),
            Self::AdkLinearPolarization(m) => m.ionization_electron_species(),
            Self::AdkCircularPolarization(m) => m.ionization_electron_species(),
            Self::Keldysh(m) => m.ionization_electron_species(),
            Self::ThomasFermi(m) => m.ionization_electron_species(),
        }
    }

    /// Sort key giving model lists a canonical order independent of
    /// registration order: family, then declaration order, then electrons.
    pub fn canonical_key(&self) -> (IonizationFamily, usize, u32) {
        let tag = self.tag();
        let position = Self::TAGS
            .iter()
            .position(|t| *t == tag)
            .unwrap_or(Self::TAGS.len());
        (self.family(), position, self.ionization_electron_species().id.0)
    }
}

/// Reject two different models of the same family across `a` and `b`.
pub fn check_families(a: &[IonizationModel], b: &[IonizationModel]) -> Result<(), String> {
    for x in a {
        for y in b {
            if x.family() == y.family() && x != y {
                return Err(format!(
                    "ionization models '{}' ({}) and '{}' ({}) belong to the same family {:?}",
                    x.tag(),
                    x.ionization_electron_species().name,
                    y.tag(),
                    y.ionization_electron_species().name,
                    x.family(),
                ));
            }
        }
    }
    Ok(())
}

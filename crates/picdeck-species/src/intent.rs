//! Delayed construction of species constants.

use picdeck_core::{SpeciesId, ValidationError};
use picdeck_requirement::{same_metadata, Category, DelayedConstruction, Requirement};
use smallvec::SmallVec;

use crate::constant::{Constant, GroundStateIonization};
use crate::ionization::{check_families, IonizationModel};
use crate::property::SpeciesProperty;

/// Contributes ionization models to the single [`GroundStateIonization`]
/// constant of a species.
///
/// Contributions from independent declarers merge by set union. The model
/// list is kept in canonical order, so the merged result does not depend on
/// registration order and merging a contribution twice changes nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundStateIonizationIntent {
    models: Vec<IonizationModel>,
}

impl GroundStateIonizationIntent {
    /// Contribution of `models`; must be non-empty with at most one model
    /// per family.
    pub fn new(models: impl IntoIterator<Item = IonizationModel>) -> Result<Self, ValidationError> {
        let mut intent = Self { models: Vec::new() };
        intent.absorb(models);
        check_families(&intent.models, &intent.models)
            .map_err(|reason| ValidationError::invalid("models", reason))?;
        if intent.models.is_empty() {
            return Err(ValidationError::invalid(
                "models",
                "at least one ionization model is required",
            ));
        }
        Ok(intent)
    }

    /// Contributed models in canonical order.
    pub fn models(&self) -> &[IonizationModel] {
        &self.models
    }

    fn absorb(&mut self, models: impl IntoIterator<Item = IonizationModel>) {
        for m in models {
            if !self.models.contains(&m) {
                self.models.push(m);
            }
        }
        self.models.sort_by_key(IonizationModel::canonical_key);
    }
}

impl DelayedConstruction<SpeciesProperty> for GroundStateIonizationIntent {
    fn target_type(&self) -> &'static str {
        "ground_state_ionization"
    }

    fn target_category(&self) -> Category {
        Category::Constant
    }

    fn must_be_unique(&self) -> bool {
        true
    }

    fn construct(&self) -> Result<SpeciesProperty, ValidationError> {
        let constant = GroundStateIonization::new(self.models.clone())?;
        Ok(Constant::GroundStateIonization(constant).into())
    }

    fn try_merge_with(&mut self, other: &dyn DelayedConstruction<SpeciesProperty>) -> bool {
        let Some(other) = other.downcast_ref::<Self>() else {
            return false;
        };
        self.absorb(other.models.iter().cloned());
        true
    }

    fn is_same_as(&self, other: &dyn DelayedConstruction<SpeciesProperty>) -> bool {
        same_metadata(self, other)
    }

    fn check_conflict(&self, other: &Requirement<SpeciesProperty>) -> Result<(), String> {
        match other {
            Requirement::Delayed(d) => match d.downcast_ref::<Self>() {
                Some(o) => check_families(&self.models, &o.models),
                None => Ok(()),
            },
            Requirement::Direct(SpeciesProperty::Constant(Constant::GroundStateIonization(c))) => {
                Err(format!(
                    "ground-state ionization is given both directly ({:?}) and through \
                     contributions ({:?})",
                    c.models(),
                    self.models
                ))
            }
            Requirement::Direct(_) => Ok(()),
        }
    }

    fn dependencies(&self) -> SmallVec<[SpeciesId; 2]> {
        let mut out: SmallVec<[SpeciesId; 2]> = SmallVec::new();
        for m in &self.models {
            let id = m.ionization_electron_species().id;
            if !out.contains(&id) {
                out.push(id);
            }
        }
        out
    }

    fn clone_boxed(&self) -> Box<dyn DelayedConstruction<SpeciesProperty>> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ionization::{AdkLinearPolarization, Bsi, BsiEffectiveZ};
    use crate::species::SpeciesRef;

    fn e(id: u32) -> SpeciesRef {
        SpeciesRef {
            id: SpeciesId(id),
            name: format!("e{id}"),
        }
    }

    #[test]
    fn merge_is_commutative_and_idempotent() {
        let bsi: IonizationModel = Bsi::new(e(0), None).unwrap().into();
        let adk: IonizationModel = AdkLinearPolarization::new(e(0), None).unwrap().into();
        let a = GroundStateIonizationIntent::new([bsi.clone()]).unwrap();
        let b = GroundStateIonizationIntent::new([adk.clone()]).unwrap();

        let mut ab = a.clone();
        assert!(ab.try_merge_with(&b));
        let mut ba = b.clone();
        assert!(ba.try_merge_with(&a));
        assert_eq!(ab, ba);
        assert_eq!(ab.models(), &[bsi, adk]);

        let mut again = ab.clone();
        assert!(again.try_merge_with(&a));
        assert_eq!(again, ab);
    }

    #[test]
    fn same_family_contributions_conflict() {
        let a = GroundStateIonizationIntent::new([Bsi::new(e(0), None).unwrap().into()]).unwrap();
        let b = GroundStateIonizationIntent::new([BsiEffectiveZ::new(e(0), None).unwrap().into()])
            .unwrap();
        assert!(a.check_conflict(&Requirement::delayed(b.clone())).is_err());
        assert!(b.check_conflict(&Requirement::delayed(a.clone())).is_err());
        // Same model, different electron species.
        let c = GroundStateIonizationIntent::new([Bsi::new(e(1), None).unwrap().into()]).unwrap();
        assert!(a.check_conflict(&Requirement::delayed(c)).is_err());
    }

    #[test]
    fn rejects_bad_contributions() {
        assert!(GroundStateIonizationIntent::new(Vec::new()).is_err());
        let pair: [IonizationModel; 2] = [
            Bsi::new(e(0), None).unwrap().into(),
            BsiEffectiveZ::new(e(0), None).unwrap().into(),
        ];
        assert!(GroundStateIonizationIntent::new(pair).is_err());
    }

    #[test]
    fn depends_on_every_electron_species() {
        let intent = GroundStateIonizationIntent::new([
            Bsi::new(e(2), None).unwrap().into(),
            AdkLinearPolarization::new(e(5), None).unwrap().into(),
        ])
        .unwrap();
        assert_eq!(intent.dependencies().as_slice(), &[SpeciesId(2), SpeciesId(5)]);
    }

    #[test]
    fn construction_is_repeatable() {
        let intent =
            GroundStateIonizationIntent::new([Bsi::new(e(0), None).unwrap().into()]).unwrap();
        assert_eq!(intent.construct().unwrap(), intent.construct().unwrap());
    }
}

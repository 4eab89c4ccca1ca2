//! The [`Species`] aggregate.
//!
//! Lifecycle: created by user configuration, then any number of declarers
//! register requirements on it, then it is sealed, then finalized. After
//! sealing the requirement bag is frozen; finalization resolves it once and
//! caches the result.

use std::cell::OnceCell;

use picdeck_core::render::render_list;
use picdeck_core::{
    check, Map, RenderContext, RenderError, RenderedObject, SpeciesId, ValidationError, Value,
};
use picdeck_requirement::{Category, RequirementBag};
use serde_json::json;

use crate::attribute::Attribute;
use crate::constant::{Charge, Constant, ElementProperties, Mass};
use crate::element::ParticleType;
use crate::error::SpeciesError;
use crate::property::{SpeciesProperty, SpeciesRequirement};

/// Lightweight handle naming a species from another configuration object.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpeciesRef {
    /// Registry id.
    pub id: SpeciesId,
    /// Species name.
    pub name: String,
}

/// A particle species: a name plus everything other objects require of it.
#[derive(Clone, Debug)]
pub struct Species {
    id: SpeciesId,
    name: String,
    particle_type: Option<ParticleType>,
    requirements: RequirementBag<SpeciesProperty>,
    sealed: bool,
    finalized: OnceCell<FinalizedSpecies>,
}

impl Species {
    /// An empty species. `name` must be an identifier.
    pub fn new(id: SpeciesId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        check::identifier("name", &name)?;
        Ok(Self {
            id,
            name,
            particle_type: None,
            requirements: RequirementBag::new(),
            sealed: false,
            finalized: OnceCell::new(),
        })
    }

    /// A species of `particle_type`, named after it unless `name` is given.
    ///
    /// Registers mass and charge, plus element properties for ions.
    pub fn with_particle_type(
        id: SpeciesId,
        name: Option<&str>,
        particle_type: ParticleType,
    ) -> Result<Self, ValidationError> {
        let mut species = Self::new(id, name.unwrap_or(particle_type.default_name()))?;
        species.particle_type = Some(particle_type);
        species
            .requirements
            .push(Mass::new(particle_type.mass_si())?);
        species
            .requirements
            .push(Charge::new(particle_type.charge_si())?);
        if let Some(element) = particle_type.element() {
            species.requirements.push(ElementProperties::new(element));
        }
        Ok(species)
    }

    /// Registry id.
    pub fn id(&self) -> SpeciesId {
        self.id
    }

    /// Species name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Particle type, if the species was created from one.
    pub fn particle_type(&self) -> Option<ParticleType> {
        self.particle_type
    }

    /// Handle for other configuration objects.
    pub fn reference(&self) -> SpeciesRef {
        SpeciesRef {
            id: self.id,
            name: self.name.clone(),
        }
    }

    /// Append requirements. No validation happens here; conflicts surface
    /// at finalization.
    pub fn register_requirements<I>(&mut self, requirements: I) -> Result<(), SpeciesError>
    where
        I: IntoIterator<Item = SpeciesRequirement>,
    {
        if self.sealed {
            return Err(SpeciesError::Sealed {
                species: self.name.clone(),
            });
        }
        let before = self.requirements.len();
        self.requirements.extend(requirements);
        tracing::debug!(
            species = %self.name,
            added = self.requirements.len() - before,
            "requirements registered"
        );
        Ok(())
    }

    /// Freeze the requirement bag. Idempotent.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Whether the species is sealed.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Registered requirements, in registration order.
    pub fn requirements(&self) -> &RequirementBag<SpeciesProperty> {
        &self.requirements
    }

    /// Resolve constants and attributes.
    ///
    /// Requires a sealed species. The result is computed once and cached;
    /// later calls return the same value.
    pub fn finalize(&self) -> Result<&FinalizedSpecies, SpeciesError> {
        if !self.sealed {
            return Err(SpeciesError::NotSealed {
                species: self.name.clone(),
            });
        }
        if let Some(done) = self.finalized.get() {
            return Ok(done);
        }

        let resolve_err = |source| SpeciesError::Resolve {
            species: self.name.clone(),
            source,
        };
        let constants = self
            .requirements
            .resolve(&[Category::Constant])
            .map_err(resolve_err)?
            .into_iter()
            .filter_map(|p| match p {
                SpeciesProperty::Constant(c) => Some(c),
                SpeciesProperty::Attribute(_) => None,
            })
            .collect();
        let attributes = self
            .requirements
            .resolve(&[Category::Attribute])
            .map_err(resolve_err)?
            .into_iter()
            .filter_map(|p| match p {
                SpeciesProperty::Attribute(a) => Some(a),
                SpeciesProperty::Constant(_) => None,
            })
            .collect();

        let done = FinalizedSpecies {
            id: self.id,
            name: self.name.clone(),
            constants,
            attributes,
        };
        tracing::debug!(species = %self.name, "species finalized");
        Ok(self.finalized.get_or_init(|| done))
    }

    /// Whether this species must be defined after `other`.
    pub fn depends_on(&self, other: &Species) -> bool {
        self.requirements.depends_on(other.id)
    }

    /// Every species this one depends on, in registration order.
    pub fn dependencies(&self) -> Vec<SpeciesId> {
        self.requirements.dependencies()
    }
}

/// A species with its requirements resolved into concrete values.
#[derive(Clone, Debug, PartialEq)]
pub struct FinalizedSpecies {
    id: SpeciesId,
    name: String,
    constants: Vec<Constant>,
    attributes: Vec<Attribute>,
}

impl FinalizedSpecies {
    /// Registry id.
    pub fn id(&self) -> SpeciesId {
        self.id
    }

    /// Species name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved constants in registration order (dependency edges included).
    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    /// Resolved attributes in registration order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// The first constant of `kind`, if any.
    pub fn constant(&self, kind: &str) -> Option<&Constant> {
        self.constants.iter().find(|c| c.kind() == kind)
    }

    /// Whether `attribute` was resolved.
    pub fn has_attribute(&self, attribute: Attribute) -> bool {
        self.attributes.contains(&attribute)
    }
}

impl RenderedObject for FinalizedSpecies {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:species"
    }

    fn serialize(&self, ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        let mut constants = Map::new();
        for kind in Constant::RENDERED_KINDS {
            constants.insert(kind.to_string(), Value::Null);
        }
        let mut seen: Vec<&str> = Vec::new();
        for constant in &self.constants {
            let Some(rendered) = constant.as_rendered() else {
                continue;
            };
            if seen.contains(&constant.kind()) {
                return Err(RenderError::Encoding {
                    schema_id: self.schema_id().to_string(),
                    reason: format!(
                        "species '{}' holds more than one '{}' constant",
                        self.name,
                        constant.kind()
                    ),
                });
            }
            seen.push(constant.kind());
            constants.insert(constant.kind().to_string(), rendered.render(ctx)?);
        }
        Ok(json!({
            "name": self.name,
            "constants": constants,
            "attributes": render_list(&self.attributes, ctx)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    #[test]
    fn names_must_be_identifiers() {
        assert!(Species::new(SpeciesId(0), "e").is_ok());
        assert!(Species::new(SpeciesId(0), "").is_err());
        assert!(Species::new(SpeciesId(0), "my ions").is_err());
    }

    #[test]
    fn particle_type_registers_defaults() {
        let mut cu = Species::with_particle_type(SpeciesId(0), None, Element::Cu.into()).unwrap();
        assert_eq!(cu.name(), "Cu");
        cu.seal();
        let done = cu.finalize().unwrap();
        let kinds: Vec<_> = done.constants().iter().map(Constant::kind).collect();
        assert_eq!(kinds, vec!["mass", "charge", "element_properties"]);
    }

    #[test]
    fn lifecycle_is_enforced() {
        let mut s = Species::new(SpeciesId(0), "s").unwrap();
        assert!(matches!(s.finalize(), Err(SpeciesError::NotSealed { .. })));
        s.register_requirements([SpeciesRequirement::from(Attribute::Position)]).unwrap();
        s.seal();
        match s.register_requirements([SpeciesRequirement::from(Attribute::Momentum)]) {
            Err(SpeciesError::Sealed { species }) => assert_eq!(species, "s"),
            other => panic!("expected Sealed, got {other:?}"),
        }
        assert_eq!(s.finalize().unwrap().attributes(), &[Attribute::Position]);
    }

    #[test]
    fn finalize_is_cached() {
        let mut s = Species::with_particle_type(SpeciesId(0), Some("e"), ParticleType::Electron)
            .unwrap();
        s.seal();
        let first = s.finalize().unwrap().clone();
        let second = s.finalize().unwrap();
        assert_eq!(&first, second);
    }

    #[test]
    fn repeated_constant_kind_is_not_rendered() {
        let done = FinalizedSpecies {
            id: SpeciesId(0),
            name: "s".into(),
            constants: vec![
                Mass::new(1.0).unwrap().into(),
                Mass::new(2.0).unwrap().into(),
            ],
            attributes: vec![Attribute::Position],
        };
        let store = picdeck_test_utils::fixtures::shipped_store();
        match done.serialize(&RenderContext::new(&store)) {
            Err(RenderError::Encoding { reason, .. }) => {
                assert!(reason.contains("'mass'"), "{reason}")
            }
            other => panic!("expected an encoding error, got {other:?}"),
        }
    }
}

//! [`SpeciesProperty`]: the value type of species requirements.

use picdeck_core::SpeciesId;
use picdeck_requirement::{Category, Requirable, Requirement};

use crate::attribute::Attribute;
use crate::constant::{
    Charge, Constant, DensityRatio, DependsOn, ElementProperties, GroundStateIonization, Mass,
};

/// A constant or attribute a species can be required to have.
#[derive(Clone, Debug, PartialEq)]
pub enum SpeciesProperty {
    /// Per-species constant.
    Constant(Constant),
    /// Per-particle attribute.
    Attribute(Attribute),
}

/// Requirement on a species.
pub type SpeciesRequirement = Requirement<SpeciesProperty>;

impl Requirable for SpeciesProperty {
    fn category(&self) -> Category {
        match self {
            Self::Constant(_) => Category::Constant,
            Self::Attribute(_) => Category::Attribute,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Constant(c) => c.kind(),
            Self::Attribute(a) => a.kind(),
        }
    }

    fn is_singleton(&self) -> bool {
        !matches!(self, Self::Constant(Constant::DependsOn(_)))
    }

    fn dependency(&self) -> Option<SpeciesId> {
        match self {
            Self::Constant(Constant::DependsOn(d)) => Some(d.species.id),
            _ => None,
        }
    }
}

impl From<Constant> for SpeciesProperty {
    fn from(c: Constant) -> Self {
        Self::Constant(c)
    }
}

impl From<Attribute> for SpeciesProperty {
    fn from(a: Attribute) -> Self {
        Self::Attribute(a)
    }
}

macro_rules! property_from_constant {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl From<$ty> for SpeciesProperty {
                fn from(c: $ty) -> Self {
                    Self::Constant(c.into())
                }
            }

            impl From<$ty> for SpeciesRequirement {
                fn from(c: $ty) -> Self {
                    Requirement::Direct(c.into())
                }
            }
        )+
    };
}

property_from_constant!(
    Mass,
    Charge,
    DensityRatio,
    ElementProperties,
    GroundStateIonization,
    DependsOn
);

impl From<Attribute> for SpeciesRequirement {
    fn from(a: Attribute) -> Self {
        Requirement::Direct(a.into())
    }
}

//! Per-species constants.

use picdeck_core::render::{encode, render_list};
use picdeck_core::{check, RenderContext, RenderError, RenderedObject, ValidationError, Value};
use serde::Serialize;
use serde_json::json;

use crate::element::Element;
use crate::ionization::{check_families, IonizationModel};
use crate::species::SpeciesRef;

/// Particle rest mass.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Mass {
    mass_si: f64,
}

impl Mass {
    /// Mass in kg; must be finite and positive.
    pub fn new(mass_si: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            mass_si: check::positive("mass_si", mass_si)?,
        })
    }

    /// Mass in kg.
    pub fn mass_si(&self) -> f64 {
        self.mass_si
    }
}

impl RenderedObject for Mass {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:species.constant.mass"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        encode(self.schema_id(), self)
    }
}

/// Particle charge (of the fully ionized particle, for ions).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Charge {
    charge_si: f64,
}

impl Charge {
    /// Charge in C; must be finite.
    pub fn new(charge_si: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            charge_si: check::finite("charge_si", charge_si)?,
        })
    }

    /// Charge in C.
    pub fn charge_si(&self) -> f64 {
        self.charge_si
    }
}

impl RenderedObject for Charge {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:species.constant.charge"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        encode(self.schema_id(), self)
    }
}

/// Density of this species relative to the reference density of its
/// placement.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DensityRatio {
    ratio: f64,
}

impl DensityRatio {
    /// Ratio; must be finite and positive.
    pub fn new(ratio: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            ratio: check::positive("ratio", ratio)?,
        })
    }

    /// The ratio.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }
}

impl RenderedObject for DensityRatio {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:species.constant.density_ratio"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        encode(self.schema_id(), self)
    }
}

/// Chemical identity of an ion species.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementProperties {
    element: Element,
}

impl ElementProperties {
    /// Properties of `element`.
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    /// The element.
    pub fn element(&self) -> Element {
        self.element
    }
}

impl RenderedObject for ElementProperties {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:species.constant.element_properties"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        Ok(json!({
            "element": self.element.symbol(),
            "atomic_number": self.element.atomic_number(),
        }))
    }
}

/// Ionization models acting on the ground state of a species.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundStateIonization {
    models: Vec<IonizationModel>,
}

impl GroundStateIonization {
    /// Model list; must be non-empty with at most one model per family.
    pub fn new(models: Vec<IonizationModel>) -> Result<Self, ValidationError> {
        if models.is_empty() {
            return Err(ValidationError::invalid(
                "models",
                "at least one ionization model is required",
            ));
        }
        check_families(&models, &models).map_err(|reason| ValidationError::invalid("models", reason))?;
        Ok(Self { models })
    }

    /// The models, in canonical order when built by resolution.
    pub fn models(&self) -> &[IonizationModel] {
        &self.models
    }
}

impl RenderedObject for GroundStateIonization {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:species.constant.ground_state_ionization"
    }

    fn serialize(&self, ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        Ok(json!({ "ionization_model_list": render_list(&self.models, ctx)? }))
    }
}

/// Edge in the species definition order: the owner must be defined after
/// `species`. Never rendered.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DependsOn {
    /// The species depended upon.
    pub species: SpeciesRef,
}

/// Any per-species constant.
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    /// See [`Mass`].
    Mass(Mass),
    /// See [`Charge`].
    Charge(Charge),
    /// See [`DensityRatio`].
    DensityRatio(DensityRatio),
    /// See [`ElementProperties`].
    ElementProperties(ElementProperties),
    /// See [`GroundStateIonization`].
    GroundStateIonization(GroundStateIonization),
    /// See [`DependsOn`].
    DependsOn(DependsOn),
}

impl Constant {
    /// Kinds that appear in a rendered species, in rendering order.
    pub const RENDERED_KINDS: [&'static str; 5] = [
        "mass",
        "charge",
        "density_ratio",
        "element_properties",
        "ground_state_ionization",
    ];

    /// Kind name; one value per kind and species, except `depends_on`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Mass(_) => "mass",
            Self::Charge(_) => "charge",
            Self::DensityRatio(_) => "density_ratio",
            Self::ElementProperties(_) => "element_properties",
            Self::GroundStateIonization(_) => "ground_state_ionization",
            Self::DependsOn(_) => "depends_on",
        }
    }

    /// The constant as a rendered object, or `None` for dependency edges.
    pub fn as_rendered(&self) -> Option<&dyn RenderedObject> {
        match self {
            Self::Mass(c) => Some(c),
            Self::Charge(c) => Some(c),
            Self::DensityRatio(c) => Some(c),
            Self::ElementProperties(c) => Some(c),
            Self::GroundStateIonization(c) => Some(c),
            Self::DependsOn(_) => None,
        }
    }
}

macro_rules! constant_from {
    ($($variant:ident),+ $(,)?) => {
        $(
            impl From<$variant> for Constant {
                fn from(c: $variant) -> Self {
                    Self::$variant(c)
                }
            }
        )+
    };
}

constant_from!(
    Mass,
    Charge,
    DensityRatio,
    ElementProperties,
    GroundStateIonization,
    DependsOn
);

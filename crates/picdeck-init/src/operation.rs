//! Initialization operations.
//!
//! Operations are what the backend executes at step zero to fill the
//! simulation with particles. They are collected as requirements on the
//! [`InitManager`](crate::InitManager) and resolved in registration order.

use picdeck_core::{RenderContext, RenderError, RenderedObject, Value};
use picdeck_requirement::{Category, Requirable, Requirement};
use picdeck_species::SpeciesRef;
use serde_json::json;

use crate::momentum::{Drift, Temperature};
use crate::profile::DensityProfile;

fn render_optional<T: RenderedObject>(
    item: Option<&T>,
    ctx: &RenderContext<'_>,
) -> Result<Value, RenderError> {
    match item {
        Some(t) => t.render(ctx),
        None => Ok(Value::Null),
    }
}

/// Place macro-particles of one or more species according to a profile.
///
/// The first species is placed; every further species is copied from it,
/// so all of them share positions.
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleDensity {
    /// Macro-particles per cell.
    pub ppc: u32,
    /// Density profile.
    pub profile: DensityProfile,
    /// Placed species, never empty.
    pub species: Vec<SpeciesRef>,
}

impl RenderedObject for SimpleDensity {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:init.operation.simple_density"
    }

    fn serialize(&self, ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        let Some((initial, copied)) = self.species.split_first() else {
            return Err(RenderError::Unresolved {
                reason: "simple density operation places no species".to_string(),
            });
        };
        let copied: Vec<&str> = copied.iter().map(|s| s.name.as_str()).collect();
        Ok(json!({
            "ppc": self.ppc,
            "profile": self.profile.render(ctx)?,
            "placed_species_initial": initial.name,
            "placed_species_copied": copied,
        }))
    }
}

/// Set the momentum of every macro-particle of a species.
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleMomentum {
    /// Target species.
    pub species: SpeciesRef,
    /// Thermal spread; particles are cold without one.
    pub temperature: Option<Temperature>,
    /// Drift; particles are at rest without one.
    pub drift: Option<Drift>,
}

impl RenderedObject for SimpleMomentum {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:init.operation.simple_momentum"
    }

    fn serialize(&self, ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        Ok(json!({
            "species": self.species.name,
            "temperature": render_optional(self.temperature.as_ref(), ctx)?,
            "drift": render_optional(self.drift.as_ref(), ctx)?,
        }))
    }
}

/// Set the initial number of bound electrons from a charge state.
#[derive(Clone, Debug, PartialEq)]
pub struct SetChargeState {
    /// Target species, an ion.
    pub species: SpeciesRef,
    /// Ionization degree: number of removed electrons.
    pub charge_state: u32,
}

impl RenderedObject for SetChargeState {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:init.operation.set_charge_state"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        Ok(json!({
            "species": self.species.name,
            "charge_state": self.charge_state,
        }))
    }
}

/// Mark a species as created only at runtime (e.g. ionization electrons).
#[derive(Clone, Debug, PartialEq)]
pub struct NotPlaced {
    /// Target species.
    pub species: SpeciesRef,
}

impl RenderedObject for NotPlaced {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:init.operation.not_placed"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        Ok(json!({ "species": self.species.name }))
    }
}

/// Any initialization operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// See [`SimpleDensity`].
    SimpleDensity(SimpleDensity),
    /// See [`SimpleMomentum`].
    SimpleMomentum(SimpleMomentum),
    /// See [`SetChargeState`].
    SetChargeState(SetChargeState),
    /// See [`NotPlaced`].
    NotPlaced(NotPlaced),
}

/// Requirement on the operation list.
pub type OperationRequirement = Requirement<Operation>;

impl Operation {
    /// Operation kinds, in the order the init plan lists them.
    pub const KINDS: [&'static str; 4] = [
        "simple_density",
        "simple_momentum",
        "set_charge_state",
        "not_placed",
    ];

    /// Kind name; key of this operation's list in the init plan.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SimpleDensity(_) => "simple_density",
            Self::SimpleMomentum(_) => "simple_momentum",
            Self::SetChargeState(_) => "set_charge_state",
            Self::NotPlaced(_) => "not_placed",
        }
    }

    /// Whether the operation acts on `species`.
    pub fn touches(&self, species: &SpeciesRef) -> bool {
        match self {
            Self::SimpleDensity(op) => op.species.iter().any(|s| s.id == species.id),
            Self::SimpleMomentum(op) => op.species.id == species.id,
            Self::SetChargeState(op) => op.species.id == species.id,
            Self::NotPlaced(op) => op.species.id == species.id,
        }
    }

    /// The operation as a rendered object.
    pub fn as_rendered(&self) -> &dyn RenderedObject {
        match self {
            Self::SimpleDensity(op) => op,
            Self::SimpleMomentum(op) => op,
            Self::SetChargeState(op) => op,
            Self::NotPlaced(op) => op,
        }
    }
}

impl Requirable for Operation {
    fn category(&self) -> Category {
        Category::Operation
    }

    fn type_name(&self) -> &'static str {
        self.kind()
    }

    // Many operations of one kind coexist; clashes are detected by the
    // intents that build them.
    fn is_singleton(&self) -> bool {
        false
    }
}

impl From<NotPlaced> for OperationRequirement {
    fn from(op: NotPlaced) -> Self {
        Requirement::Direct(Operation::NotPlaced(op))
    }
}

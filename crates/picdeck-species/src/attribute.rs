//! Per-particle attributes.

use picdeck_core::{RenderContext, RenderError, RenderedObject, Value};
use serde_json::json;

/// A per-particle attribute the backend allocates for a species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// In-cell position.
    Position,
    /// Macro-particle weighting.
    Weighting,
    /// Momentum.
    Momentum,
    /// Number of electrons still bound to an ion.
    BoundElectrons,
}

impl Attribute {
    /// Attribute name in the generated code.
    pub fn picongpu_name(self) -> &'static str {
        match self {
            Self::Position => "position<position_pic>",
            Self::Weighting => "weighting",
            Self::Momentum => "momentum",
            Self::BoundElectrons => "boundElectrons",
        }
    }

    /// Kind name used for requirement matching.
    pub fn kind(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Weighting => "weighting",
            Self::Momentum => "momentum",
            Self::BoundElectrons => "bound_electrons",
        }
    }
}

impl RenderedObject for Attribute {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:species.attribute"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        Ok(json!({ "picongpu_name": self.picongpu_name() }))
    }
}

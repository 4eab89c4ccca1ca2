//! [`InitPlan`]: the finalized particle initialization.

use picdeck_core::render::render_list;
use picdeck_core::{Map, RenderContext, RenderError, RenderedObject, Value};
use picdeck_species::FinalizedSpecies;
use serde_json::json;

use crate::operation::Operation;

/// Species in definition order plus the resolved operations.
#[derive(Clone, Debug, PartialEq)]
pub struct InitPlan {
    species: Vec<FinalizedSpecies>,
    operations: Vec<Operation>,
}

impl InitPlan {
    pub(crate) fn new(species: Vec<FinalizedSpecies>, operations: Vec<Operation>) -> Self {
        Self {
            species,
            operations,
        }
    }

    /// Species in definition order.
    pub fn species(&self) -> &[FinalizedSpecies] {
        &self.species
    }

    /// Operations in registration order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Operations of one kind, in registration order.
    pub fn operations_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Operation> + 'a {
        self.operations.iter().filter(move |op| op.kind() == kind)
    }
}

impl RenderedObject for InitPlan {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:init.plan"
    }

    fn serialize(&self, ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        let mut operations = Map::new();
        for kind in Operation::KINDS {
            let rendered = self
                .operations_of(kind)
                .map(|op| op.as_rendered().render(ctx))
                .collect::<Result<Vec<_>, _>>()?;
            operations.insert(kind.to_string(), Value::Array(rendered));
        }
        Ok(json!({
            "species": render_list(&self.species, ctx)?,
            "operations": operations,
        }))
    }
}

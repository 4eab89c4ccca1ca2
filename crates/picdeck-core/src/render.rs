//! The rendered-object protocol.
//!
//! Every serializable configuration object implements [`RenderedObject`]:
//! it produces its own mapping ([`serialize`](RenderedObject::serialize)) and
//! the provided [`render`](RenderedObject::render) validates that mapping
//! against the schema registered for the object's type identifier.
//! Composite objects call `render` on their children from inside
//! `serialize`, so every node of the final mapping is validated
//! independently and immediately.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::RenderError;

/// External schema validator: given a type identifier and a candidate
/// mapping, confirm or reject it.
///
/// Implemented by `picdeck_schema::SchemaStore`. Rendered objects only see
/// this trait, never the store itself.
pub trait SchemaValidator {
    /// Validate `candidate` against the schema registered under `schema_id`.
    ///
    /// Returns [`RenderError::SchemaNotFound`] if no schema is registered
    /// and [`RenderError::SchemaViolation`] if the candidate does not conform.
    fn validate(&self, schema_id: &str, candidate: &Value) -> Result<(), RenderError>;
}

/// Destination directory for side configuration files produced while
/// serializing (e.g. plugin backend configs).
///
/// Writes are fire-and-forget: the file is never read back, and the mapping
/// returned by the writer must not depend on where the file landed.
#[derive(Clone, Debug)]
pub struct SideFileSink {
    dir: PathBuf,
}

impl SideFileSink {
    /// Create a sink writing into `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the sink writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `contents` as pretty-printed JSON to `<dir>/<file_name>`.
    pub fn write_json(&self, file_name: &str, contents: &Value) -> Result<PathBuf, RenderError> {
        let path = self.dir.join(file_name);
        let side_file_err = |reason: String| RenderError::SideFile {
            path: path.clone(),
            reason,
        };
        fs::create_dir_all(&self.dir).map_err(|e| side_file_err(e.to_string()))?;
        let text = serde_json::to_string_pretty(contents).map_err(|e| side_file_err(e.to_string()))?;
        fs::write(&path, text).map_err(|e| side_file_err(e.to_string()))?;
        tracing::debug!(path = %path.display(), "side file written");
        Ok(path)
    }
}

/// Everything a rendered object needs while producing its mapping.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    validator: &'a dyn SchemaValidator,
    side_files: Option<&'a SideFileSink>,
}

impl<'a> RenderContext<'a> {
    /// Context validating against `validator`, with side files disabled.
    pub fn new(validator: &'a dyn SchemaValidator) -> Self {
        Self {
            validator,
            side_files: None,
        }
    }

    /// Enable side-file output into `sink`.
    pub fn with_side_files(mut self, sink: &'a SideFileSink) -> Self {
        self.side_files = Some(sink);
        self
    }

    /// The side-file sink, if side files are enabled.
    pub fn side_files(&self) -> Option<&'a SideFileSink> {
        self.side_files
    }

    /// Validate `candidate` against `schema_id`.
    pub fn validate(&self, schema_id: &str, candidate: &Value) -> Result<(), RenderError> {
        self.validator.validate(schema_id, candidate)
    }
}

/// An object that can produce a schema-validated mapping of its entire
/// observable state.
///
/// Two value-equal instances must produce value-equal mappings; the mapping
/// is a pure function of the object's state even if a side file is written.
pub trait RenderedObject {
    /// Fully-qualified type identifier the mapping is validated against.
    fn schema_id(&self) -> &'static str;

    /// Produce this object's mapping without validating it.
    ///
    /// Composite objects render their children via
    /// [`render`](RenderedObject::render) so that nested nodes are
    /// validated as well.
    fn serialize(&self, ctx: &RenderContext<'_>) -> Result<Value, RenderError>;

    /// Produce the validated mapping (the object's rendering context).
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        let value = self.serialize(ctx)?;
        ctx.validate(self.schema_id(), &value)?;
        Ok(value)
    }
}

/// Encode a plain `Serialize` value as a mapping.
///
/// Convenience for leaf objects whose mapping is exactly their serde form.
pub fn encode<T: Serialize>(schema_id: &str, value: &T) -> Result<Value, RenderError> {
    serde_json::to_value(value).map_err(|e| RenderError::Encoding {
        schema_id: schema_id.to_string(),
        reason: e.to_string(),
    })
}

/// Render each item in order into a JSON array.
pub fn render_list<'i, T, I>(items: I, ctx: &RenderContext<'_>) -> Result<Value, RenderError>
where
    T: RenderedObject + 'i,
    I: IntoIterator<Item = &'i T>,
{
    let rendered = items
        .into_iter()
        .map(|item| item.render(ctx))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(rendered))
}

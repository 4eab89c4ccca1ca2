//! Schema fixtures for rendering tests.

use std::cell::RefCell;
use std::path::PathBuf;

use picdeck_core::{RenderError, SchemaValidator, Value};
use picdeck_schema::SchemaStore;

/// Directory holding the schemas shipped with the workspace.
pub fn schema_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("schemas")
}

/// Store loaded from [`schema_dir`]. Panics if the shipped schemas are broken.
pub fn shipped_store() -> SchemaStore {
    match SchemaStore::load_dir(schema_dir()) {
        Ok(store) => store,
        Err(e) => panic!("shipped schemas failed to load: {e}"),
    }
}

/// Fresh scratch directory under the system temp dir, unique per process
/// and `label`. Any previous contents are removed.
pub fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("picdeck-{label}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

/// Accepts every candidate.
pub struct AcceptAll;

impl SchemaValidator for AcceptAll {
    fn validate(&self, _schema_id: &str, _candidate: &Value) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Accepts every candidate and records what it was asked to validate,
/// in call order.
#[derive(Default)]
pub struct RecordingValidator {
    calls: RefCell<Vec<(String, Value)>>,
}

impl RecordingValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema ids validated so far, in call order.
    pub fn schema_ids(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(id, _)| id.clone()).collect()
    }

    /// Candidates validated against `schema_id`.
    pub fn candidates(&self, schema_id: &str) -> Vec<Value> {
        self.calls
            .borrow()
            .iter()
            .filter(|(id, _)| id == schema_id)
            .map(|(_, v)| v.clone())
            .collect()
    }
}

impl SchemaValidator for RecordingValidator {
    fn validate(&self, schema_id: &str, candidate: &Value) -> Result<(), RenderError> {
        self.calls
            .borrow_mut()
            .push((schema_id.to_string(), candidate.clone()));
        Ok(())
    }
}

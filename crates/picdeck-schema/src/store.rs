//! The [`SchemaStore`]: type identifier → schema document.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use picdeck_core::{RenderError, SchemaValidator};
use serde_json::Value;
use walkdir::WalkDir;

use crate::error::SchemaError;
use crate::validate::Validator;

/// Mapping from fully-qualified type identifier (the document's `$id`) to
/// its JSON-Schema document.
///
/// Populated once, never invalidated. Lookups are by exact identifier.
#[derive(Clone, Debug, Default)]
pub struct SchemaStore {
    schemas: IndexMap<String, Value>,
}

impl SchemaStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Crawl `dir` recursively and register every `*.json` file.
    ///
    /// Files are visited in path order so that duplicate-id errors are
    /// reported deterministically.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let dir = dir.as_ref();
        let mut files: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(dir) {
            let entry = entry.map_err(|e| SchemaError::Io {
                path: e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf),
                reason: e.to_string(),
            })?;
            if entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "json")
            {
                files.push(entry.into_path());
            }
        }
        files.sort();

        let mut store = Self::new();
        for path in &files {
            let text = fs::read_to_string(path).map_err(|e| SchemaError::Io {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            let document: Value =
                serde_json::from_str(&text).map_err(|e| SchemaError::Malformed {
                    origin: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            store.insert_from(document, &path.display().to_string())?;
        }
        tracing::info!(dir = %dir.display(), schemas = store.len(), "schema store loaded");
        Ok(store)
    }

    /// Register one schema document under its `$id`.
    pub fn insert(&mut self, document: Value) -> Result<(), SchemaError> {
        self.insert_from(document, "<memory>")
    }

    fn insert_from(&mut self, document: Value, origin: &str) -> Result<(), SchemaError> {
        let Value::Object(ref map) = document else {
            return Err(SchemaError::Malformed {
                origin: origin.to_string(),
                reason: "schema document must be an object".to_string(),
            });
        };
        let id = match map.get("$id") {
            Some(Value::String(id)) => id.clone(),
            _ => {
                return Err(SchemaError::MissingId {
                    origin: origin.to_string(),
                })
            }
        };
        if map.get("unevaluatedProperties") != Some(&Value::Bool(false)) {
            tracing::warn!(
                schema = %id,
                origin,
                "schema is not closed: unevaluatedProperties should be false"
            );
        }
        if self.schemas.contains_key(&id) {
            return Err(SchemaError::DuplicateId { id });
        }
        self.schemas.insert(id, document);
        Ok(())
    }

    /// Look up a schema document by identifier.
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.schemas.get(id)
    }

    /// Whether a schema is registered under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.schemas.contains_key(id)
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the store holds no schemas.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered identifiers in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Validate and return every violation instead of failing on the first node.
    pub fn violations(&self, schema_id: &str, candidate: &Value) -> Result<Vec<String>, RenderError> {
        let schema = self.get(schema_id).ok_or_else(|| RenderError::SchemaNotFound {
            schema_id: schema_id.to_string(),
        })?;
        Ok(Validator::new(self).check_document(schema, candidate))
    }
}

impl SchemaValidator for SchemaStore {
    fn validate(&self, schema_id: &str, candidate: &Value) -> Result<(), RenderError> {
        let violations = self.violations(schema_id, candidate)?;
        if violations.is_empty() {
            Ok(())
        } else {
            Err(RenderError::SchemaViolation {
                schema_id: schema_id.to_string(),
                violations,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mass_schema() -> Value {
        json!({
            "$id": "urn:picdeck:test.mass",
            "type": "object",
            "properties": {"mass_si": {"type": "number", "exclusiveMinimum": 0}},
            "required": ["mass_si"],
            "unevaluatedProperties": false
        })
    }

    #[test]
    fn insert_and_validate() {
        let mut store = SchemaStore::new();
        store.insert(mass_schema()).unwrap();
        assert!(store.contains("urn:picdeck:test.mass"));
        assert!(store.validate("urn:picdeck:test.mass", &json!({"mass_si": 1.0})).is_ok());
    }

    #[test]
    fn unknown_id_is_schema_not_found() {
        let store = SchemaStore::new();
        match store.validate("urn:picdeck:nope", &json!({})) {
            Err(RenderError::SchemaNotFound { schema_id }) => assert_eq!(schema_id, "urn:picdeck:nope"),
            other => panic!("expected SchemaNotFound, got {other:?}"),
        }
    }

    #[test]
    fn violation_reports_path() {
        let mut store = SchemaStore::new();
        store.insert(mass_schema()).unwrap();
        match store.validate("urn:picdeck:test.mass", &json!({"mass_si": -1.0})) {
            Err(RenderError::SchemaViolation { violations, .. }) => {
                assert_eq!(violations.len(), 1);
                assert!(violations[0].starts_with("/mass_si"), "{violations:?}");
            }
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut store = SchemaStore::new();
        store.insert(mass_schema()).unwrap();
        assert_eq!(
            store.insert(mass_schema()),
            Err(SchemaError::DuplicateId {
                id: "urn:picdeck:test.mass".to_string()
            })
        );
    }

    #[test]
    fn missing_id_rejected() {
        let mut store = SchemaStore::new();
        assert!(matches!(
            store.insert(json!({"type": "object"})),
            Err(SchemaError::MissingId { .. })
        ));
        assert!(matches!(
            store.insert(json!([1, 2])),
            Err(SchemaError::Malformed { .. })
        ));
    }

    #[test]
    fn open_schema_is_accepted_with_warning() {
        let mut store = SchemaStore::new();
        store
            .insert(json!({"$id": "urn:picdeck:test.open", "type": "object"}))
            .unwrap();
        assert!(store.validate("urn:picdeck:test.open", &json!({"x": 1})).is_ok());
    }
}

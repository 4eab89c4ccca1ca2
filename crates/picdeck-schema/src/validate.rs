//! JSON-Schema (draft 2020-12) evaluation.
//!
//! Covers the keyword subset the shipped schemas use. Unknown keywords are
//! annotations and ignored. Each violation is reported as
//! `<instance pointer>: <message>`.

use indexmap::IndexSet;
use serde_json::{Map, Value};

use crate::store::SchemaStore;

/// Maximum `$ref` nesting before evaluation gives up (guards ref cycles).
const MAX_DEPTH: usize = 64;

/// Property names evaluated at one instance location, for
/// `unevaluatedProperties`.
type Evaluated = IndexSet<String>;

pub(crate) struct Validator<'s> {
    store: &'s SchemaStore,
}

impl<'s> Validator<'s> {
    pub(crate) fn new(store: &'s SchemaStore) -> Self {
        Self { store }
    }

    /// Validate `instance` against a whole document.
    pub(crate) fn check_document(&self, document: &Value, instance: &Value) -> Vec<String> {
        let mut out = Vec::new();
        self.check(document, document, instance, "", 0, &mut out);
        out
    }

    fn check(
        &self,
        schema: &Value,
        root: &Value,
        instance: &Value,
        path: &str,
        depth: usize,
        out: &mut Vec<String>,
    ) -> Evaluated {
        let mut evaluated = Evaluated::new();
        let schema = match schema {
            Value::Bool(true) => return evaluated,
            Value::Bool(false) => {
                out.push(violation(path, "no value is allowed here"));
                return evaluated;
            }
            Value::Object(schema) => schema,
            _ => {
                out.push(violation(path, "schema node is neither an object nor a boolean"));
                return evaluated;
            }
        };
        if depth > MAX_DEPTH {
            out.push(violation(path, "schema nesting too deep (reference cycle?)"));
            return evaluated;
        }

        if let Some(Value::String(reference)) = schema.get("$ref") {
            match self.resolve_ref(reference, root) {
                Some((target, target_root)) => {
                    let inner = self.check(target, target_root, instance, path, depth + 1, out);
                    evaluated.extend(inner);
                }
                None => out.push(violation(path, &format!("unresolvable $ref '{reference}'"))),
            }
        }

        if let Some(expected) = schema.get("type") {
            check_type(expected, instance, path, out);
        }
        if let Some(Value::Array(options)) = schema.get("enum") {
            if !options.contains(instance) {
                out.push(violation(path, &format!("{instance} is not one of {}", Value::Array(options.clone()))));
            }
        }
        if let Some(constant) = schema.get("const") {
            if constant != instance {
                out.push(violation(path, &format!("expected {constant}, got {instance}")));
            }
        }

        match instance {
            Value::Number(n) => {
                if let Some(x) = n.as_f64() {
                    check_bounds(schema, x, path, out);
                }
            }
            Value::String(s) => {
                if let Some(min) = schema.get("minLength").and_then(Value::as_u64) {
                    if (s.chars().count() as u64) < min {
                        out.push(violation(path, &format!("string shorter than {min}")));
                    }
                }
            }
            Value::Array(items) => self.check_array(schema, root, items, path, depth, out),
            Value::Object(object) => {
                let inner = self.check_object(schema, root, object, path, depth, out);
                evaluated.extend(inner);
            }
            _ => {}
        }

        if let Some(Value::Array(subschemas)) = schema.get("allOf") {
            for sub in subschemas {
                let inner = self.check(sub, root, instance, path, depth + 1, out);
                evaluated.extend(inner);
            }
        }
        if let Some(Value::Array(subschemas)) = schema.get("anyOf") {
            let mut any = false;
            for sub in subschemas {
                let mut scratch = Vec::new();
                let inner = self.check(sub, root, instance, path, depth + 1, &mut scratch);
                if scratch.is_empty() {
                    any = true;
                    evaluated.extend(inner);
                }
            }
            if !any {
                out.push(violation(path, "matches none of the anyOf alternatives"));
            }
        }
        if let Some(Value::Array(subschemas)) = schema.get("oneOf") {
            let mut matching = 0usize;
            for sub in subschemas {
                let mut scratch = Vec::new();
                let inner = self.check(sub, root, instance, path, depth + 1, &mut scratch);
                if scratch.is_empty() {
                    matching += 1;
                    evaluated.extend(inner);
                }
            }
            if matching != 1 {
                out.push(violation(
                    path,
                    &format!("matches {matching} oneOf alternatives, expected exactly 1"),
                ));
            }
        }

        if let (Some(unevaluated), Value::Object(object)) =
            (schema.get("unevaluatedProperties"), instance)
        {
            for (key, value) in object {
                if evaluated.contains(key) {
                    continue;
                }
                let child = child_path(path, key);
                match unevaluated {
                    Value::Bool(false) => {
                        out.push(violation(&child, "unexpected property"));
                    }
                    sub => {
                        self.check(sub, root, value, &child, depth + 1, out);
                    }
                }
                evaluated.insert(key.clone());
            }
        }

        evaluated
    }

    fn check_array(
        &self,
        schema: &Map<String, Value>,
        root: &Value,
        items: &[Value],
        path: &str,
        depth: usize,
        out: &mut Vec<String>,
    ) {
        if let Some(min) = schema.get("minItems").and_then(Value::as_u64) {
            if (items.len() as u64) < min {
                out.push(violation(path, &format!("expected at least {min} items, got {}", items.len())));
            }
        }
        if let Some(max) = schema.get("maxItems").and_then(Value::as_u64) {
            if (items.len() as u64) > max {
                out.push(violation(path, &format!("expected at most {max} items, got {}", items.len())));
            }
        }
        let mut prefix_len = 0;
        if let Some(Value::Array(prefix)) = schema.get("prefixItems") {
            prefix_len = prefix.len();
            for (i, (sub, item)) in prefix.iter().zip(items).enumerate() {
                self.check(sub, root, item, &child_path(path, &i.to_string()), depth + 1, out);
            }
        }
        if let Some(sub) = schema.get("items") {
            for (i, item) in items.iter().enumerate().skip(prefix_len) {
                self.check(sub, root, item, &child_path(path, &i.to_string()), depth + 1, out);
            }
        }
    }

    fn check_object(
        &self,
        schema: &Map<String, Value>,
        root: &Value,
        object: &Map<String, Value>,
        path: &str,
        depth: usize,
        out: &mut Vec<String>,
    ) -> Evaluated {
        let mut evaluated = Evaluated::new();
        if let Some(Value::Array(required)) = schema.get("required") {
            for key in required.iter().filter_map(Value::as_str) {
                if !object.contains_key(key) {
                    out.push(violation(path, &format!("missing required property '{key}'")));
                }
            }
        }
        let properties = match schema.get("properties") {
            Some(Value::Object(properties)) => Some(properties),
            _ => None,
        };
        if let Some(properties) = properties {
            for (key, sub) in properties {
                if let Some(value) = object.get(key) {
                    self.check(sub, root, value, &child_path(path, key), depth + 1, out);
                    evaluated.insert(key.clone());
                }
            }
        }
        if let Some(additional) = schema.get("additionalProperties") {
            for (key, value) in object {
                if properties.is_some_and(|p| p.contains_key(key)) {
                    continue;
                }
                let child = child_path(path, key);
                match additional {
                    Value::Bool(false) => out.push(violation(&child, "unexpected property")),
                    sub => {
                        self.check(sub, root, value, &child, depth + 1, out);
                    }
                }
                evaluated.insert(key.clone());
            }
        }
        evaluated
    }

    /// Resolve `reference` to `(target schema, target document root)`.
    ///
    /// Supports local pointers (`#/$defs/x`) and absolute identifiers of
    /// other stored documents, optionally followed by a pointer fragment.
    fn resolve_ref<'a>(&'a self, reference: &str, root: &'a Value) -> Option<(&'a Value, &'a Value)> {
        let (base, fragment) = match reference.split_once('#') {
            Some((base, fragment)) => (base, fragment),
            None => (reference, ""),
        };
        let document = if base.is_empty() {
            root
        } else {
            self.store.get(base)?
        };
        let target = if fragment.is_empty() {
            document
        } else {
            document.pointer(fragment)?
        };
        Some((target, document))
    }
}

fn check_type(expected: &Value, instance: &Value, path: &str, out: &mut Vec<String>) {
    let matches = match expected {
        Value::String(name) => type_matches(name, instance),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .any(|name| type_matches(name, instance)),
        _ => true,
    };
    if !matches {
        out.push(violation(
            path,
            &format!("expected type {expected}, got {}", type_name(instance)),
        ));
    }
}

fn type_matches(name: &str, instance: &Value) -> bool {
    match name {
        "null" => instance.is_null(),
        "boolean" => instance.is_boolean(),
        "string" => instance.is_string(),
        "array" => instance.is_array(),
        "object" => instance.is_object(),
        "number" => instance.is_number(),
        "integer" => match instance {
            Value::Number(n) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|x| x.fract() == 0.0)
            }
            _ => false,
        },
        _ => false,
    }
}

fn type_name(instance: &Value) -> &'static str {
    match instance {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn check_bounds(schema: &Map<String, Value>, x: f64, path: &str, out: &mut Vec<String>) {
    if let Some(min) = schema.get("minimum").and_then(Value::as_f64) {
        if x < min {
            out.push(violation(path, &format!("{x} < minimum {min}")));
        }
    }
    if let Some(max) = schema.get("maximum").and_then(Value::as_f64) {
        if x > max {
            out.push(violation(path, &format!("{x} > maximum {max}")));
        }
    }
    if let Some(min) = schema.get("exclusiveMinimum").and_then(Value::as_f64) {
        if x <= min {
            out.push(violation(path, &format!("{x} <= exclusiveMinimum {min}")));
        }
    }
    if let Some(max) = schema.get("exclusiveMaximum").and_then(Value::as_f64) {
        if x >= max {
            out.push(violation(path, &format!("{x} >= exclusiveMaximum {max}")));
        }
    }
}

/// Append `key` to a JSON pointer, escaping `~` and `/`.
fn child_path(path: &str, key: &str) -> String {
    format!("{path}/{}", key.replace('~', "~0").replace('/', "~1"))
}

fn violation(path: &str, message: &str) -> String {
    let path = if path.is_empty() { "/" } else { path };
    format!("{path}: {message}")
}

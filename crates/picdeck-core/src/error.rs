//! Error types shared across picdeck.
//!
//! Two of the fatal error kinds live here because every crate raises them:
//! [`ValidationError`] at construction time and [`RenderError`] at
//! serialization time. Resolution-time conflicts are defined next to the
//! resolver in `picdeck-requirement`.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// A configuration value failed a type or domain constraint.
///
/// Raised eagerly by the configuration object itself (in its constructor or
/// `validate()`), never deferred to build time.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationError {
    /// A numeric parameter lies outside its admissible range.
    OutOfRange {
        /// Name of the offending parameter.
        parameter: String,
        /// The rejected value.
        value: f64,
        /// Human-readable description of the admissible range.
        expected: String,
    },
    /// A parameter is structurally invalid (wrong length, empty, not normalized, ...).
    InvalidArgument {
        /// Name of the offending parameter.
        parameter: String,
        /// Description of the failure.
        reason: String,
    },
    /// A feature was requested that the backend cannot honor.
    Unsupported {
        /// Name of the unsupported feature.
        feature: String,
        /// The requested value, formatted.
        requested: String,
        /// The only value the backend accepts.
        safe_default: String,
    },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::InvalidArgument`].
    pub fn invalid(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ValidationError::OutOfRange`].
    pub fn out_of_range(parameter: impl Into<String>, value: f64, expected: impl Into<String>) -> Self {
        Self::OutOfRange {
            parameter: parameter.into(),
            value,
            expected: expected.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange {
                parameter,
                value,
                expected,
            } => write!(f, "{parameter} = {value} is out of range (expected {expected})"),
            Self::InvalidArgument { parameter, reason } => {
                write!(f, "invalid {parameter}: {reason}")
            }
            Self::Unsupported {
                feature,
                requested,
                safe_default,
            } => write!(
                f,
                "feature '{feature}' is not supported: requested {requested}, \
                 only {safe_default} is accepted"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Errors from the serialization/validation pipeline.
///
/// All variants are fatal: picdeck never emits unvalidated output.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderError {
    /// No schema is registered for the type identifier.
    SchemaNotFound {
        /// The type identifier that was looked up.
        schema_id: String,
    },
    /// The serialized mapping does not conform to its schema.
    SchemaViolation {
        /// The schema the mapping was validated against.
        schema_id: String,
        /// One entry per failed check, each prefixed with its JSON pointer.
        violations: Vec<String>,
    },
    /// A side configuration file could not be written.
    SideFile {
        /// Path of the file that failed.
        path: PathBuf,
        /// Description of the I/O failure.
        reason: String,
    },
    /// A value could not be encoded into the context mapping.
    Encoding {
        /// Type identifier of the object being encoded.
        schema_id: String,
        /// The encoder's error message.
        reason: String,
    },
    /// The object cannot be rendered yet (e.g. no schema store installed,
    /// or a referenced aggregate is not finalized).
    Unresolved {
        /// Description of what is missing.
        reason: String,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaNotFound { schema_id } => {
                write!(f, "no schema registered for '{schema_id}'")
            }
            Self::SchemaViolation {
                schema_id,
                violations,
            } => {
                write!(f, "mapping violates schema '{schema_id}': ")?;
                for (i, v) in violations.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{v}")?;
                }
                Ok(())
            }
            Self::SideFile { path, reason } => {
                write!(f, "cannot write side file {}: {reason}", path.display())
            }
            Self::Encoding { schema_id, reason } => {
                write!(f, "cannot encode '{schema_id}': {reason}")
            }
            Self::Unresolved { reason } => write!(f, "cannot render: {reason}"),
        }
    }
}

impl Error for RenderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_display_names_parameter() {
        let err = ValidationError::out_of_range("density_si", -1.0, "> 0");
        let msg = err.to_string();
        assert!(msg.contains("density_si"));
        assert!(msg.contains("-1"));
    }

    #[test]
    fn schema_violation_display_lists_all() {
        let err = RenderError::SchemaViolation {
            schema_id: "urn:picdeck:test".to_string(),
            violations: vec!["/a: expected number".into(), "/b: missing".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("/a: expected number; /b: missing"));
    }
}

//! Schema store loading errors.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Errors raised while populating a [`SchemaStore`](crate::SchemaStore).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaError {
    /// A schema file or directory could not be read.
    Io {
        /// The path that failed.
        path: PathBuf,
        /// Description of the I/O failure.
        reason: String,
    },
    /// A schema file is not valid JSON, or not a JSON object.
    Malformed {
        /// Where the document came from.
        origin: String,
        /// Description of the parse failure.
        reason: String,
    },
    /// A schema document has no string `$id`.
    MissingId {
        /// Where the document came from.
        origin: String,
    },
    /// Two documents declare the same `$id`.
    DuplicateId {
        /// The contested identifier.
        id: String,
    },
    /// A process-wide store is already installed.
    AlreadyInstalled,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, reason } => write!(f, "cannot read {}: {reason}", path.display()),
            Self::Malformed { origin, reason } => {
                write!(f, "malformed schema in {origin}: {reason}")
            }
            Self::MissingId { origin } => write!(f, "schema in {origin} has no $id"),
            Self::DuplicateId { id } => write!(f, "schema id '{id}' registered twice"),
            Self::AlreadyInstalled => write!(f, "a global schema store is already installed"),
        }
    }
}

impl Error for SchemaError {}

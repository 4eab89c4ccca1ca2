//! Species lifecycle errors.

use std::error::Error;
use std::fmt;

use picdeck_requirement::ResolveError;

/// Errors raised by the [`Species`](crate::Species) lifecycle.
#[derive(Clone, Debug, PartialEq)]
pub enum SpeciesError {
    /// Requirements were registered after the species was sealed.
    Sealed {
        /// Name of the species.
        species: String,
    },
    /// `finalize()` was called before the species was sealed.
    NotSealed {
        /// Name of the species.
        species: String,
    },
    /// The species' requirements could not be resolved.
    Resolve {
        /// Name of the species.
        species: String,
        /// The underlying resolution failure.
        source: ResolveError,
    },
}

impl fmt::Display for SpeciesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sealed { species } => {
                write!(f, "species '{species}' is sealed; no further requirements accepted")
            }
            Self::NotSealed { species } => {
                write!(f, "species '{species}' must be sealed before it is finalized")
            }
            Self::Resolve { species, source } => {
                write!(f, "species '{species}': {source}")
            }
        }
    }
}

impl Error for SpeciesError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Resolve { source, .. } => Some(source),
            Self::Sealed { .. } | Self::NotSealed { .. } => None,
        }
    }
}

//! Initialization errors.

use std::error::Error;
use std::fmt;

use picdeck_core::{SpeciesId, ValidationError};
use picdeck_requirement::ResolveError;
use picdeck_species::SpeciesError;

/// Errors raised while declaring or finalizing particle initialization.
#[derive(Clone, Debug, PartialEq)]
pub enum InitError {
    /// The manager is sealed; nothing can be added.
    Sealed,
    /// `finalize()` was called before `seal()`.
    NotSealed,
    /// A species id that the manager never handed out.
    UnknownSpecies {
        /// The offending id.
        id: SpeciesId,
    },
    /// Two species were given the same name.
    DuplicateSpecies {
        /// The repeated name.
        name: String,
    },
    /// Species dependencies form a cycle.
    DependencyCycle {
        /// Species that could not be ordered, in registry order.
        species: Vec<String>,
    },
    /// A species lacks an attribute every particle needs.
    MissingAttribute {
        /// Species name.
        species: String,
        /// Attribute kind.
        attribute: &'static str,
    },
    /// A species tracks bound electrons but no charge state initializes them.
    MissingChargeState {
        /// Species name.
        species: String,
    },
    /// A declarer was given invalid arguments.
    Validation(ValidationError),
    /// A species failed to register or finalize.
    Species(SpeciesError),
    /// The operation list could not be resolved.
    Operations(ResolveError),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sealed => write!(f, "initialization is sealed; no further declarations accepted"),
            Self::NotSealed => write!(f, "initialization must be sealed before it is finalized"),
            Self::UnknownSpecies { id } => write!(f, "unknown species id {}", id.0),
            Self::DuplicateSpecies { name } => write!(f, "species name '{name}' is already taken"),
            Self::DependencyCycle { species } => {
                write!(f, "species dependencies form a cycle among: {}", species.join(", "))
            }
            Self::MissingAttribute { species, attribute } => write!(
                f,
                "species '{species}' has no '{attribute}' attribute; \
                 it is neither placed nor marked as not placed"
            ),
            Self::MissingChargeState { species } => write!(
                f,
                "species '{species}' tracks bound electrons but has no initial charge state"
            ),
            Self::Validation(e) => write!(f, "{e}"),
            Self::Species(e) => write!(f, "{e}"),
            Self::Operations(e) => write!(f, "init operations: {e}"),
        }
    }
}

impl Error for InitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Species(e) => Some(e),
            Self::Operations(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for InitError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<SpeciesError> for InitError {
    fn from(e: SpeciesError) -> Self {
        Self::Species(e)
    }
}

impl From<ResolveError> for InitError {
    fn from(e: ResolveError) -> Self {
        Self::Operations(e)
    }
}

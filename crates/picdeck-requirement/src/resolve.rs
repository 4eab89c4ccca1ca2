//! The resolution engine.
//!
//! [`resolve`] turns a registration-ordered bag into the ordered list of
//! concrete values for a set of categories. Order is preserved end to end
//! because downstream code generation derives identifiers from it.

use std::error::Error;
use std::fmt;

use picdeck_core::ValidationError;

use crate::requirement::{Category, Requirable, Requirement};

// ── Errors ─────────────────────────────────────────────────────────

/// Two requirements on one aggregate cannot both hold.
#[derive(Clone, Debug, PartialEq)]
pub struct RequirementConflict {
    /// The requirement being added (later in registration order).
    pub lhs: String,
    /// The already-accepted requirement it clashes with.
    pub rhs: String,
    /// Why they clash, as reported by the conflict check.
    pub reason: String,
}

impl fmt::Display for RequirementConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requirement {} conflicts with {}: {}",
            self.lhs, self.rhs, self.reason
        )
    }
}

impl Error for RequirementConflict {}

/// Errors from [`resolve`].
#[derive(Clone, Debug, PartialEq)]
pub enum ResolveError {
    /// Two requirements are mutually incompatible.
    Conflict(RequirementConflict),
    /// A surviving delayed requirement failed to construct its value.
    Construction {
        /// Kind name of the value being constructed.
        target: &'static str,
        /// The validation failure raised by the constructor.
        source: ValidationError,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict(c) => write!(f, "{c}"),
            Self::Construction { target, source } => {
                write!(f, "constructing '{target}' failed: {source}")
            }
        }
    }
}

impl Error for ResolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Conflict(c) => Some(c),
            Self::Construction { source, .. } => Some(source),
        }
    }
}

impl From<RequirementConflict> for ResolveError {
    fn from(c: RequirementConflict) -> Self {
        Self::Conflict(c)
    }
}

// ── Resolution ─────────────────────────────────────────────────────

/// Resolve `requirements` into concrete values for `categories`.
///
/// Steps, in registration order:
///
/// 1. Keep only requirements whose (target) category is in `categories`.
/// 2. For each candidate, scan the accepted list in order: conflict-check
///    against every accepted entry; try to merge the candidate into the
///    entry (success discards the candidate and ends the scan); otherwise
///    a unique candidate equivalent to the entry is marked as a duplicate,
///    and the scan continues so later entries are still conflict-checked.
/// 3. Append candidates that were neither absorbed nor duplicates.
/// 4. Construct every accepted entry.
///
/// The input is never mutated: merges act on working copies, so resolving
/// the same bag twice yields equal results.
pub fn resolve<V: Requirable>(
    requirements: &[Requirement<V>],
    categories: &[Category],
) -> Result<Vec<V>, ResolveError> {
    let mut accepted: Vec<Requirement<V>> = Vec::new();

    for lhs in requirements
        .iter()
        .filter(|r| categories.contains(&r.category()))
    {
        let mut absorbed = false;
        let mut duplicate = false;

        for rhs in accepted.iter_mut() {
            lhs.check_for_conflict(rhs)
                .map_err(|reason| RequirementConflict {
                    lhs: format!("{lhs:?}"),
                    rhs: format!("{rhs:?}"),
                    reason,
                })?;

            if rhs.try_update_with(lhs) {
                tracing::debug!(kind = lhs.type_name(), "requirement merged");
                absorbed = true;
                break;
            }

            if lhs.must_be_unique() && lhs.is_same_as(rhs) {
                duplicate = true;
            }
        }

        if duplicate && !absorbed {
            tracing::debug!(kind = lhs.type_name(), "duplicate requirement dropped");
        }
        if !absorbed && !duplicate {
            accepted.push(lhs.clone());
        }
    }

    accepted
        .iter()
        .map(|r| {
            r.run_construction()
                .map_err(|source| ResolveError::Construction {
                    target: r.type_name(),
                    source,
                })
        })
        .collect()
}

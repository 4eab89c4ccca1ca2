//! The requirement data model.
//!
//! Optional behaviors of delayed requirements (merging, equivalence,
//! conflict checks) are default methods on [`DelayedConstruction`], so
//! each intent kind states statically which of them it supports.

use std::any::Any;
use std::fmt;

use picdeck_core::{SpeciesId, ValidationError};
use smallvec::SmallVec;

/// Coarse type category used to select requirements during resolution.
///
/// Resolution runs once per category; a delayed requirement is matched by
/// the category of the value it will construct, not by its own type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Per-species constant (mass, charge, ionization models, ...).
    Constant,
    /// Per-particle attribute (position, momentum, ...).
    Attribute,
    /// Initialization operation executed by the backend.
    Operation,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant => write!(f, "constant"),
            Self::Attribute => write!(f, "attribute"),
            Self::Operation => write!(f, "operation"),
        }
    }
}

/// A concrete value that can be required of an aggregate.
///
/// Direct requirements are always unique: two equal values collapse into
/// one during resolution.
pub trait Requirable: Clone + PartialEq + fmt::Debug + 'static {
    /// Category this value is resolved under.
    fn category(&self) -> Category;

    /// Short kind name, e.g. `"mass"`. Values of the same kind compete for
    /// the same slot when [`is_singleton`](Requirable::is_singleton).
    fn type_name(&self) -> &'static str;

    /// Whether an aggregate holds at most one value of this kind.
    ///
    /// Default: `true`.
    fn is_singleton(&self) -> bool {
        true
    }

    /// Species this value makes its owner depend on, if any.
    fn dependency(&self) -> Option<SpeciesId> {
        None
    }

    /// Reject `other` if it cannot coexist with `self` on one aggregate.
    ///
    /// Default: two unequal singleton values of the same kind conflict.
    fn check_conflict(&self, other: &Self) -> Result<(), String> {
        if self.is_singleton()
            && other.is_singleton()
            && self.type_name() == other.type_name()
            && self != other
        {
            Err(format!(
                "'{}' requested with two different values: {self:?} and {other:?}",
                self.type_name()
            ))
        } else {
            Ok(())
        }
    }
}

/// An intent to construct a value of type `V` once the rest of the
/// configuration is known.
///
/// # Contract
///
/// - `construct()` must depend only on the intent's own metadata and be
///   repeatable: calling it twice yields equal values.
/// - `try_merge_with()` mutates `self` only when it returns `true`.
/// - `is_same_as()` and `check_conflict()` are pure.
///
/// The resolver tries `is_same_as` in both directions and runs
/// `check_conflict` from both sides, so an implementation only needs to
/// recognize the kinds it knows about.
pub trait DelayedConstruction<V>: Any + fmt::Debug + 'static {
    /// Kind name of the value this intent constructs.
    fn target_type(&self) -> &'static str;

    /// Category of the value this intent constructs.
    fn target_category(&self) -> Category;

    /// Whether equivalent intents collapse into one.
    ///
    /// Default: `false`.
    fn must_be_unique(&self) -> bool {
        false
    }

    /// Build the concrete value.
    fn construct(&self) -> Result<V, ValidationError>;

    /// Fold `other`'s information into `self`.
    ///
    /// Returns `true` if `other` is now fully represented by `self` and can
    /// be discarded. Default: never merges.
    fn try_merge_with(&mut self, other: &dyn DelayedConstruction<V>) -> bool {
        let _ = other;
        false
    }

    /// Equivalence for deduplication. Default: `false`.
    ///
    /// Use [`same_metadata`] for plain metadata equality.
    fn is_same_as(&self, other: &dyn DelayedConstruction<V>) -> bool {
        let _ = other;
        false
    }

    /// Reject `other` if it cannot coexist with `self`. Default: compatible.
    fn check_conflict(&self, other: &Requirement<V>) -> Result<(), String> {
        let _ = other;
        Ok(())
    }

    /// Species the constructed value will make its owner depend on.
    fn dependencies(&self) -> SmallVec<[SpeciesId; 2]> {
        SmallVec::new()
    }

    /// Clone into a fresh box.
    fn clone_boxed(&self) -> Box<dyn DelayedConstruction<V>>;
}

impl<V: 'static> dyn DelayedConstruction<V> {
    /// Attempt to downcast a trait object to a concrete intent type.
    pub fn downcast_ref<T: DelayedConstruction<V>>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}

/// Metadata equality: `other` is the same concrete type as `this` and
/// compares equal.
pub fn same_metadata<T, V>(this: &T, other: &dyn DelayedConstruction<V>) -> bool
where
    T: DelayedConstruction<V> + PartialEq,
    V: 'static,
{
    other.downcast_ref::<T>().is_some_and(|o| o == this)
}

/// Something an aggregate must eventually possess.
#[derive(Debug)]
pub enum Requirement<V> {
    /// An already-constructed value.
    Direct(V),
    /// An intent to construct a value during resolution.
    Delayed(Box<dyn DelayedConstruction<V>>),
}

impl<V: Requirable> Requirement<V> {
    /// Wrap an intent.
    pub fn delayed(intent: impl DelayedConstruction<V>) -> Self {
        Self::Delayed(Box::new(intent))
    }

    /// Category the requirement is resolved under.
    pub fn category(&self) -> Category {
        match self {
            Self::Direct(v) => v.category(),
            Self::Delayed(d) => d.target_category(),
        }
    }

    /// Kind name of the (eventual) value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Direct(v) => v.type_name(),
            Self::Delayed(d) => d.target_type(),
        }
    }

    /// Direct values are always unique; intents decide for themselves.
    pub fn must_be_unique(&self) -> bool {
        match self {
            Self::Direct(_) => true,
            Self::Delayed(d) => d.must_be_unique(),
        }
    }

    /// Produce the concrete value. Direct values are returned as-is.
    pub fn run_construction(&self) -> Result<V, ValidationError> {
        match self {
            Self::Direct(v) => Ok(v.clone()),
            Self::Delayed(d) => d.construct(),
        }
    }

    /// Try to absorb `other` into `self`. Only intents merge.
    pub fn try_update_with(&mut self, other: &Requirement<V>) -> bool {
        match (self, other) {
            (Self::Delayed(this), Self::Delayed(other)) => this.try_merge_with(other.as_ref()),
            _ => false,
        }
    }

    /// Equivalence for deduplication, tried from both sides.
    pub fn is_same_as(&self, other: &Requirement<V>) -> bool {
        match (self, other) {
            (Self::Direct(a), Self::Direct(b)) => a == b,
            (Self::Delayed(a), Self::Delayed(b)) => {
                a.is_same_as(b.as_ref()) || b.is_same_as(a.as_ref())
            }
            _ => false,
        }
    }

    /// Conflict check, run from both sides.
    pub fn check_for_conflict(&self, other: &Requirement<V>) -> Result<(), String> {
        if let (Self::Direct(a), Self::Direct(b)) = (self, other) {
            a.check_conflict(b)?;
            return b.check_conflict(a);
        }
        if let Self::Delayed(a) = self {
            a.check_conflict(other)?;
        }
        if let Self::Delayed(b) = other {
            b.check_conflict(self)?;
        }
        Ok(())
    }

    /// Species this requirement makes its owner depend on.
    pub fn dependencies(&self) -> SmallVec<[SpeciesId; 2]> {
        match self {
            Self::Direct(v) => v.dependency().into_iter().collect(),
            Self::Delayed(d) => d.dependencies(),
        }
    }
}

impl<V: Clone + 'static> Clone for Requirement<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Direct(v) => Self::Direct(v.clone()),
            Self::Delayed(d) => Self::Delayed(d.clone_boxed()),
        }
    }
}

impl<V: Requirable> From<V> for Requirement<V> {
    fn from(value: V) -> Self {
        Self::Direct(value)
    }
}

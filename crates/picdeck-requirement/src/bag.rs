//! [`RequirementBag`]: the registration-ordered requirements of one aggregate.

use picdeck_core::SpeciesId;

use crate::requirement::{Category, Requirable, Requirement};
use crate::resolve::{resolve, ResolveError};

/// Requirements of one aggregate, in registration order.
///
/// Append-only. Order is significant: it decides which of two equivalent
/// requirements survives and the order of the resolved values.
#[derive(Debug)]
pub struct RequirementBag<V> {
    entries: Vec<Requirement<V>>,
}

impl<V: Clone + 'static> Clone for RequirementBag<V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<V> Default for RequirementBag<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V: Requirable> RequirementBag<V> {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one requirement.
    pub fn push(&mut self, requirement: impl Into<Requirement<V>>) {
        let requirement = requirement.into();
        tracing::trace!(kind = requirement.type_name(), "requirement registered");
        self.entries.push(requirement);
    }

    /// Append requirements preserving their order.
    pub fn extend<I: IntoIterator<Item = Requirement<V>>>(&mut self, requirements: I) {
        for r in requirements {
            self.push(r);
        }
    }

    /// Number of registered requirements (before resolution).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered requirements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Requirement<V>> {
        self.entries.iter()
    }

    /// Registered requirements as a slice.
    pub fn as_slice(&self) -> &[Requirement<V>] {
        &self.entries
    }

    /// Resolve the bag for `categories`. See [`resolve`].
    pub fn resolve(&self, categories: &[Category]) -> Result<Vec<V>, ResolveError> {
        resolve(&self.entries, categories)
    }

    /// Every species some requirement makes the owner depend on, in
    /// registration order, without repeats.
    pub fn dependencies(&self) -> Vec<SpeciesId> {
        let mut out: Vec<SpeciesId> = Vec::new();
        for id in self.entries.iter().flat_map(Requirement::dependencies) {
            if !out.contains(&id) {
                out.push(id);
            }
        }
        out
    }

    /// Whether some requirement makes the owner depend on `species`.
    pub fn depends_on(&self, species: SpeciesId) -> bool {
        self.entries
            .iter()
            .any(|r| r.dependencies().contains(&species))
    }
}

impl<V: Requirable> FromIterator<Requirement<V>> for RequirementBag<V> {
    fn from_iter<I: IntoIterator<Item = Requirement<V>>>(iter: I) -> Self {
        let mut bag = Self::new();
        bag.extend(iter);
        bag
    }
}

impl<'a, V> IntoIterator for &'a RequirementBag<V> {
    type Item = &'a Requirement<V>;
    type IntoIter = std::slice::Iter<'a, Requirement<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirement::DelayedConstruction;
    use picdeck_core::ValidationError;

    #[derive(Clone, Debug, PartialEq)]
    enum Edge {
        To(SpeciesId),
        Weight,
    }

    impl Requirable for Edge {
        fn category(&self) -> Category {
            Category::Constant
        }
        fn type_name(&self) -> &'static str {
            match self {
                Self::To(_) => "edge",
                Self::Weight => "weight",
            }
        }
        fn is_singleton(&self) -> bool {
            matches!(self, Self::Weight)
        }
        fn dependency(&self) -> Option<SpeciesId> {
            match self {
                Self::To(id) => Some(*id),
                Self::Weight => None,
            }
        }
    }

    #[test]
    fn dependencies_in_order_without_repeats() {
        let bag: RequirementBag<Edge> = [
            Edge::To(SpeciesId(2)),
            Edge::Weight,
            Edge::To(SpeciesId(0)),
            Edge::To(SpeciesId(2)),
        ]
        .into_iter()
        .map(Requirement::Direct)
        .collect();
        assert_eq!(bag.len(), 4);
        assert_eq!(bag.dependencies(), vec![SpeciesId(2), SpeciesId(0)]);
        assert!(bag.depends_on(SpeciesId(0)));
        assert!(!bag.depends_on(SpeciesId(1)));
    }

    #[test]
    fn bag_resolves_its_entries() {
        let mut bag: RequirementBag<Edge> = RequirementBag::new();
        bag.push(Edge::Weight);
        bag.push(Edge::Weight);
        assert_eq!(bag.resolve(&[Category::Constant]).unwrap(), vec![Edge::Weight]);
        assert!(!bag.is_empty());
    }

    /// Weight intent that counts how many contributions it absorbed.
    #[derive(Clone, Debug, PartialEq)]
    struct WeightIntent {
        merged: u32,
    }

    impl DelayedConstruction<Edge> for WeightIntent {
        fn target_type(&self) -> &'static str {
            "weight"
        }
        fn target_category(&self) -> Category {
            Category::Constant
        }
        fn construct(&self) -> Result<Edge, ValidationError> {
            Ok(Edge::Weight)
        }
        fn try_merge_with(&mut self, other: &dyn DelayedConstruction<Edge>) -> bool {
            match other.downcast_ref::<Self>() {
                Some(o) => {
                    self.merged += o.merged;
                    true
                }
                None => false,
            }
        }
        fn clone_boxed(&self) -> Box<dyn DelayedConstruction<Edge>> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn cloned_bag_with_intents_resolves_independently() {
        let mut bag: RequirementBag<Edge> = RequirementBag::new();
        bag.push(Edge::To(SpeciesId(1)));
        bag.push(Requirement::delayed(WeightIntent { merged: 1 }));
        bag.push(Requirement::delayed(WeightIntent { merged: 1 }));

        let copy = bag.clone();
        let expected = vec![Edge::To(SpeciesId(1)), Edge::Weight];
        assert_eq!(bag.resolve(&[Category::Constant]).unwrap(), expected);
        assert_eq!(copy.resolve(&[Category::Constant]).unwrap(), expected);
        assert_eq!(copy.len(), bag.len());
    }
}

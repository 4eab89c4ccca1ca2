//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a species within a simulation's species registry.
///
/// Species are registered in the init manager and assigned sequential IDs.
/// `SpeciesId(n)` corresponds to the n-th registered species. The ID carries
/// no name: names are user-chosen and live on the species itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpeciesId(pub u32);

impl SpeciesId {
    /// Index into the registry's species list.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SpeciesId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

//! Chemical elements and particle types.

use std::fmt;

use picdeck_core::units::{ATOMIC_MASS_UNIT, ELECTRON_MASS, ELEMENTARY_CHARGE};
use serde::Serialize;

/// A chemical element usable as an ion species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Element {
    /// Hydrogen.
    H,
    /// Helium.
    He,
    /// Lithium.
    Li,
    /// Beryllium.
    Be,
    /// Boron.
    B,
    /// Carbon.
    C,
    /// Nitrogen.
    N,
    /// Oxygen.
    O,
    /// Fluorine.
    F,
    /// Neon.
    Ne,
    /// Aluminium.
    Al,
    /// Silicon.
    Si,
    /// Copper.
    Cu,
    /// Gold.
    Au,
}

impl Element {
    /// Every supported element, ordered by atomic number.
    pub const ALL: [Element; 14] = [
        Self::H,
        Self::He,
        Self::Li,
        Self::Be,
        Self::B,
        Self::C,
        Self::N,
        Self::O,
        Self::F,
        Self::Ne,
        Self::Al,
        Self::Si,
        Self::Cu,
        Self::Au,
    ];

    /// Chemical symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::H => "H",
            Self::He => "He",
            Self::Li => "Li",
            Self::Be => "Be",
            Self::B => "B",
            Self::C => "C",
            Self::N => "N",
            Self::O => "O",
            Self::F => "F",
            Self::Ne => "Ne",
            Self::Al => "Al",
            Self::Si => "Si",
            Self::Cu => "Cu",
            Self::Au => "Au",
        }
    }

    /// Number of protons, which is also the number of electrons of the
    /// neutral atom.
    pub fn atomic_number(self) -> u32 {
        match self {
            Self::H => 1,
            Self::He => 2,
            Self::Li => 3,
            Self::Be => 4,
            Self::B => 5,
            Self::C => 6,
            Self::N => 7,
            Self::O => 8,
            Self::F => 9,
            Self::Ne => 10,
            Self::Al => 13,
            Self::Si => 14,
            Self::Cu => 29,
            Self::Au => 79,
        }
    }

    /// Standard atomic weight in atomic mass units.
    pub fn atomic_weight(self) -> f64 {
        match self {
            Self::H => 1.008,
            Self::He => 4.002_602,
            Self::Li => 6.94,
            Self::Be => 9.012_183,
            Self::B => 10.81,
            Self::C => 12.011,
            Self::N => 14.007,
            Self::O => 15.999,
            Self::F => 18.998_403,
            Self::Ne => 20.1797,
            Self::Al => 26.981_538,
            Self::Si => 28.085,
            Self::Cu => 63.546,
            Self::Au => 196.966_57,
        }
    }

    /// Atom mass in kg.
    pub fn mass_si(self) -> f64 {
        self.atomic_weight() * ATOMIC_MASS_UNIT
    }

    /// Charge of the fully ionized nucleus in C.
    pub fn nuclear_charge_si(self) -> f64 {
        f64::from(self.atomic_number()) * ELEMENTARY_CHARGE
    }

    /// Look up an element by symbol (case-sensitive).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.symbol() == symbol)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// What a species is made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleType {
    /// Electrons.
    Electron,
    /// Positrons.
    Positron,
    /// Ions (or neutral atoms) of an element.
    Element(Element),
}

impl ParticleType {
    /// Species name used when the user does not choose one.
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Electron => "electron",
            Self::Positron => "positron",
            Self::Element(e) => e.symbol(),
        }
    }

    /// Rest mass in kg.
    pub fn mass_si(self) -> f64 {
        match self {
            Self::Electron | Self::Positron => ELECTRON_MASS,
            Self::Element(e) => e.mass_si(),
        }
    }

    /// Charge in C. Ions carry the full nuclear charge; bound electrons are
    /// tracked separately per particle.
    pub fn charge_si(self) -> f64 {
        match self {
            Self::Electron => -ELEMENTARY_CHARGE,
            Self::Positron => ELEMENTARY_CHARGE,
            Self::Element(e) => e.nuclear_charge_si(),
        }
    }

    /// The element, for ion species.
    pub fn element(self) -> Option<Element> {
        match self {
            Self::Element(e) => Some(e),
            Self::Electron | Self::Positron => None,
        }
    }
}

impl From<Element> for ParticleType {
    fn from(e: Element) -> Self {
        Self::Element(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_roundtrip() {
        for e in Element::ALL {
            assert_eq!(Element::from_symbol(e.symbol()), Some(e));
        }
        assert_eq!(Element::from_symbol("Xx"), None);
    }

    #[test]
    fn atomic_numbers_increase() {
        for pair in Element::ALL.windows(2) {
            assert!(pair[0].atomic_number() < pair[1].atomic_number());
            assert!(pair[0].mass_si() < pair[1].mass_si());
        }
    }

    #[test]
    fn particle_type_defaults() {
        assert_eq!(ParticleType::Electron.default_name(), "electron");
        assert_eq!(ParticleType::Element(Element::Cu).default_name(), "Cu");
        assert!(ParticleType::Electron.charge_si() < 0.0);
        assert_eq!(
            ParticleType::Element(Element::He).charge_si(),
            2.0 * ELEMENTARY_CHARGE
        );
        assert_eq!(ParticleType::Positron.element(), None);
    }
}

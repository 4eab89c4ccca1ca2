//! Toy requirement kinds for resolver tests.
//!
//! - [`ToyValue`]: direct values: singleton slots, accumulated lists, free tags.
//! - [`ListIntent`]: mergeable intent, set-union of its items.
//! - [`SlotIntent`]: unique intent, conflicts on a different value for the same slot.

use picdeck_core::ValidationError;
use picdeck_requirement::{same_metadata, Category, DelayedConstruction, Requirable, Requirement};

const SLOT_NAMES: [&str; 4] = ["slot0", "slot1", "slot2", "slot3"];

/// Number of distinct slots a toy value can occupy.
pub const SLOT_COUNT: u8 = SLOT_NAMES.len() as u8;

#[derive(Clone, Debug, PartialEq)]
pub enum ToyValue {
    /// One value per slot (singleton, constant).
    Slot { slot: u8, value: u8 },
    /// Accumulated list (singleton, constant).
    List(Vec<u8>),
    /// Free-standing tag (not a singleton, attribute).
    Tag(u8),
}

impl Requirable for ToyValue {
    fn category(&self) -> Category {
        match self {
            Self::Slot { .. } | Self::List(_) => Category::Constant,
            Self::Tag(_) => Category::Attribute,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Slot { slot, .. } => SLOT_NAMES[usize::from(*slot) % SLOT_NAMES.len()],
            Self::List(_) => "list",
            Self::Tag(_) => "tag",
        }
    }

    fn is_singleton(&self) -> bool {
        !matches!(self, Self::Tag(_))
    }
}

/// Contributes items to the single [`ToyValue::List`].
#[derive(Clone, Debug, PartialEq)]
pub struct ListIntent {
    pub items: Vec<u8>,
}

impl ListIntent {
    pub fn new(items: impl IntoIterator<Item = u8>) -> Self {
        let mut items: Vec<u8> = items.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        Self { items }
    }
}

impl DelayedConstruction<ToyValue> for ListIntent {
    fn target_type(&self) -> &'static str {
        "list"
    }

    fn target_category(&self) -> Category {
        Category::Constant
    }

    fn construct(&self) -> Result<ToyValue, ValidationError> {
        Ok(ToyValue::List(self.items.clone()))
    }

    fn try_merge_with(&mut self, other: &dyn DelayedConstruction<ToyValue>) -> bool {
        let Some(other) = other.downcast_ref::<Self>() else {
            return false;
        };
        self.items.extend_from_slice(&other.items);
        self.items.sort_unstable();
        self.items.dedup();
        true
    }

    fn clone_boxed(&self) -> Box<dyn DelayedConstruction<ToyValue>> {
        Box::new(self.clone())
    }
}

/// Requests `value` in `slot`.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotIntent {
    pub slot: u8,
    pub value: u8,
}

impl SlotIntent {
    fn clashes(&self, slot: u8, value: u8) -> bool {
        self.slot % SLOT_COUNT == slot % SLOT_COUNT && self.value != value
    }
}

impl DelayedConstruction<ToyValue> for SlotIntent {
    fn target_type(&self) -> &'static str {
        SLOT_NAMES[usize::from(self.slot) % SLOT_NAMES.len()]
    }

    fn target_category(&self) -> Category {
        Category::Constant
    }

    fn must_be_unique(&self) -> bool {
        true
    }

    fn construct(&self) -> Result<ToyValue, ValidationError> {
        Ok(ToyValue::Slot {
            slot: self.slot,
            value: self.value,
        })
    }

    fn is_same_as(&self, other: &dyn DelayedConstruction<ToyValue>) -> bool {
        same_metadata(self, other)
    }

    fn check_conflict(&self, other: &Requirement<ToyValue>) -> Result<(), String> {
        let clash = match other {
            Requirement::Direct(ToyValue::Slot { slot, value }) => self.clashes(*slot, *value),
            Requirement::Delayed(d) => d
                .downcast_ref::<Self>()
                .is_some_and(|o| self.clashes(o.slot, o.value)),
            Requirement::Direct(_) => false,
        };
        if clash {
            Err(format!("slot {} requested twice with different values", self.slot))
        } else {
            Ok(())
        }
    }

    fn clone_boxed(&self) -> Box<dyn DelayedConstruction<ToyValue>> {
        Box::new(self.clone())
    }
}

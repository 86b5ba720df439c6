//! Call-site attribute lists.
//!
//! Attributes are keyed by a flat index space: index 0 is the return slot, arguments start
//! at index 1, and the function itself uses [`AttributeList::FUNCTION_INDEX`].

use crate::types::Type;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    ElementType(Type),
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::ElementType(ty) => write!(f, "elementtype({})", ty),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeList {
    slots: BTreeMap<u32, Vec<Attribute>>,
}

impl AttributeList {
    pub const RETURN_INDEX: u32 = 0;
    pub const FIRST_ARG_INDEX: u32 = 1;
    pub const FUNCTION_INDEX: u32 = u32::MAX;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_at_index(&mut self, index: u32, attr: Attribute) {
        let slot = self.slots.entry(index).or_default();
        if !slot.contains(&attr) {
            slot.push(attr);
        }
    }

    pub fn at_index(&self, index: u32) -> &[Attribute] {
        self.slots.get(&index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots.keys().copied()
    }
}

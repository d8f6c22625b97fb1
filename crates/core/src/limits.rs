//! Fixed machine capacity configuration.

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Maximum number of distinct snack kinds one machine can hold.
pub const MAX_VARIETY: u32 = 10;

/// Maximum number of units of a single snack kind.
pub const MAX_QUANTITY: u32 = 20;

/// Capacity bounds an inventory is parameterized by.
///
/// These are read-only for the lifetime of an inventory. Production machines
/// use [`Limits::default`]; tests construct smaller bounds to exercise the
/// caps without ten adds per case.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    max_variety: u32,
    max_quantity: u32,
}

impl Limits {
    pub fn new(max_variety: u32, max_quantity: u32) -> Self {
        Self {
            max_variety,
            max_quantity,
        }
    }

    pub fn max_variety(&self) -> u32 {
        self.max_variety
    }

    pub fn max_quantity(&self) -> u32 {
        self.max_quantity
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(MAX_VARIETY, MAX_QUANTITY)
    }
}

impl ValueObject for Limits {}

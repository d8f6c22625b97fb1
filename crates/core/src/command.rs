//! Domain command trait.

use crate::id::InventoryId;

/// A command targets a specific inventory.
///
/// Commands represent **intent** - a request to perform an action on an
/// inventory. They are transient and are transformed into events. A command
/// is rejected if invalid; events represent accepted changes.
pub trait Command: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// The inventory this command operates on.
    fn target(&self) -> InventoryId;
}

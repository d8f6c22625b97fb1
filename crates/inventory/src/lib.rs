//! Inventory domain module.
//!
//! This crate contains the business rules for one vending machine's snack
//! stock, implemented purely as deterministic domain logic (no IO, no
//! randomness, no clocks). The random draw and business timestamps live in
//! the session layer and arrive here inside commands.

pub mod inventory;

pub use inventory::{
    AcceptOffer, AddSnack, DeclineOffer, Inventory, InventoryCommand, InventoryEvent, OfferDeclined,
    OfferSnack, RefillBy, RefillToMax, RemoveSnack, Snack, SnackAdded, SnackDispensed, SnackOffered,
    SnackRefilled, SnackRemoved,
};

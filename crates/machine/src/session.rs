//! Command execution pipeline for one vending machine.
//!
//! The session is the single actor over its inventory: it builds commands,
//! runs the aggregate's handle/apply cycle, and hands the emitted event back
//! to the caller as the operation's outcome. Randomness and wall-clock time
//! enter the system here and nowhere else.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use vendo_core::{Aggregate, Command, DomainError, DomainResult, Event, InventoryId, Limits};
use vendo_inventory::{
    AcceptOffer, AddSnack, DeclineOffer, Inventory, InventoryCommand, InventoryEvent, OfferDeclined,
    OfferSnack, RefillBy, RefillToMax, RemoveSnack, SnackAdded, SnackDispensed, SnackOffered,
    SnackRefilled, SnackRemoved,
};

/// Stock a fresh demo machine starts with.
const EXAMPLE_STOCK: &[(&str, u32)] = &[("Jerky", 2), ("Chips", 3), ("Candy", 5)];

/// A user's session against one vending machine.
///
/// Operations run to completion one at a time; there is exactly one logical
/// actor per inventory. Generic over the random source so tests can seed it.
#[derive(Debug)]
pub struct VendingSession<R: Rng = StdRng> {
    inventory: Inventory,
    rng: R,
}

impl VendingSession<StdRng> {
    /// A fresh, empty machine with an entropy-seeded generator.
    pub fn new(limits: Limits) -> Self {
        Self::with_rng(limits, StdRng::from_entropy())
    }

    /// A machine pre-stocked with the demo snacks (Jerky, Chips, Candy).
    pub fn with_example_stock() -> DomainResult<Self> {
        let mut session = Self::new(Limits::default());
        for (name, quantity) in EXAMPLE_STOCK {
            session.add_snack(name, *quantity)?;
        }
        Ok(session)
    }
}

impl<R: Rng> VendingSession<R> {
    /// A fresh machine with a caller-provided random source.
    pub fn with_rng(limits: Limits, rng: R) -> Self {
        Self {
            inventory: Inventory::new(InventoryId::new(), limits),
            rng,
        }
    }

    /// Read access to the machine's current stock.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Stock a new snack kind with a starting quantity.
    pub fn add_snack(&mut self, name: &str, quantity: u32) -> DomainResult<SnackAdded> {
        let cmd = InventoryCommand::AddSnack(AddSnack {
            inventory_id: self.inventory.id_typed(),
            name: name.to_string(),
            quantity,
            occurred_at: Utc::now(),
        });
        match self.execute(cmd)? {
            InventoryEvent::SnackAdded(ev) => Ok(ev),
            other => Err(unexpected_event("add", &other)),
        }
    }

    /// Remove a snack kind entirely. The outcome's `now_empty` flag tells the
    /// caller whether the machine is now out of snacks altogether.
    pub fn remove_snack(&mut self, name: &str) -> DomainResult<SnackRemoved> {
        let cmd = InventoryCommand::RemoveSnack(RemoveSnack {
            inventory_id: self.inventory.id_typed(),
            name: name.to_string(),
            occurred_at: Utc::now(),
        });
        match self.execute(cmd)? {
            InventoryEvent::SnackRemoved(ev) => Ok(ev),
            other => Err(unexpected_event("remove", &other)),
        }
    }

    /// Top a snack up to the per-snack cap.
    pub fn refill_to_max(&mut self, name: &str) -> DomainResult<SnackRefilled> {
        let cmd = InventoryCommand::RefillToMax(RefillToMax {
            inventory_id: self.inventory.id_typed(),
            name: name.to_string(),
            occurred_at: Utc::now(),
        });
        match self.execute(cmd)? {
            InventoryEvent::SnackRefilled(ev) => Ok(ev),
            other => Err(unexpected_event("refill", &other)),
        }
    }

    /// Add `amount` units, clamping at the per-snack cap. A clamped refill
    /// still succeeds; the outcome's `clamped` flag carries the warning.
    pub fn refill_by(&mut self, name: &str, amount: u32) -> DomainResult<SnackRefilled> {
        let cmd = InventoryCommand::RefillBy(RefillBy {
            inventory_id: self.inventory.id_typed(),
            name: name.to_string(),
            amount,
            occurred_at: Utc::now(),
        });
        match self.execute(cmd)? {
            InventoryEvent::SnackRefilled(ev) => {
                if ev.clamped {
                    tracing::warn!(name = %ev.name, quantity = ev.quantity, "refill clamped at capacity");
                }
                Ok(ev)
            }
            other => Err(unexpected_event("refill", &other)),
        }
    }

    /// Offer a uniformly random snack for dispensing.
    ///
    /// Every stocked kind has equal probability regardless of quantity, so an
    /// out-of-stock snack can be offered; the outcome flags it. The offer
    /// stays pending until [`accept_offer`](Self::accept_offer) or
    /// [`decline_offer`](Self::decline_offer) resolves it.
    pub fn request_snack(&mut self) -> DomainResult<SnackOffered> {
        if let Some(pending) = self.inventory.pending_offer() {
            return Err(DomainError::offer_pending(pending.to_string()));
        }

        let names = self.inventory.snack_names();
        if names.is_empty() {
            return Err(DomainError::EmptyInventory);
        }
        let pick = self.rng.gen_range(0..names.len());

        let cmd = InventoryCommand::OfferSnack(OfferSnack {
            inventory_id: self.inventory.id_typed(),
            name: names[pick].clone(),
            occurred_at: Utc::now(),
        });
        match self.execute(cmd)? {
            InventoryEvent::SnackOffered(ev) => Ok(ev),
            other => Err(unexpected_event("offer", &other)),
        }
    }

    /// Accept the pending offer and dispense one unit.
    ///
    /// The offered name is resolved from the machine's own state rather than
    /// taken from the caller, so there is nothing to mismatch. Accepting an
    /// out-of-stock offer succeeds without dispensing anything.
    pub fn accept_offer(&mut self) -> DomainResult<SnackDispensed> {
        let Some(name) = self.inventory.pending_offer() else {
            return Err(DomainError::NoOffer);
        };

        let cmd = InventoryCommand::AcceptOffer(AcceptOffer {
            inventory_id: self.inventory.id_typed(),
            name: name.to_string(),
            occurred_at: Utc::now(),
        });
        match self.execute(cmd)? {
            InventoryEvent::SnackDispensed(ev) => Ok(ev),
            other => Err(unexpected_event("accept", &other)),
        }
    }

    /// Decline the pending offer, leaving stock untouched.
    pub fn decline_offer(&mut self) -> DomainResult<OfferDeclined> {
        let Some(name) = self.inventory.pending_offer() else {
            return Err(DomainError::NoOffer);
        };

        let cmd = InventoryCommand::DeclineOffer(DeclineOffer {
            inventory_id: self.inventory.id_typed(),
            name: name.to_string(),
            occurred_at: Utc::now(),
        });
        match self.execute(cmd)? {
            InventoryEvent::OfferDeclined(ev) => Ok(ev),
            other => Err(unexpected_event("decline", &other)),
        }
    }

    /// Handle the command, apply every emitted event, and return the last
    /// one. Handlers emit exactly one event per accepted command.
    fn execute(&mut self, command: InventoryCommand) -> DomainResult<InventoryEvent> {
        let mut events = self.inventory.handle(&command)?;
        for event in &events {
            self.inventory.apply(event);
            tracing::debug!(
                inventory = %command.target(),
                event = event.event_type(),
                "applied inventory event"
            );
        }
        events
            .pop()
            .ok_or_else(|| DomainError::invariant("accepted command emitted no events"))
    }
}

fn unexpected_event(operation: &str, event: &InventoryEvent) -> DomainError {
    DomainError::invariant(format!(
        "unexpected event for {operation}: {}",
        event.event_type()
    ))
}

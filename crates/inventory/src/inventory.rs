use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendo_core::{
    Aggregate, AggregateRoot, Command, DomainError, Entity, Event, InventoryId, Limits,
};

/// One stocked snack kind, as handed to callers (read model).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snack {
    pub name: String,
    pub quantity: u32,
}

impl Entity for Snack {
    type Id = String;

    fn id(&self) -> &String {
        &self.name
    }
}

/// Aggregate root: Inventory (one machine's snack stock).
///
/// Variety is derived from the mapping itself, so `variety()` can never
/// drift from the number of stocked kinds. Keys are stored trimmed; sorted
/// key order keeps the session's random draw deterministic under a seeded
/// generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    id: InventoryId,
    limits: Limits,
    snacks: BTreeMap<String, u32>,
    pending_offer: Option<String>,
    version: u64,
}

impl Inventory {
    /// Create a machine with nothing stocked.
    pub fn new(id: InventoryId, limits: Limits) -> Self {
        Self {
            id,
            limits,
            snacks: BTreeMap::new(),
            pending_offer: None,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> InventoryId {
        self.id
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Number of distinct snack kinds currently stocked.
    pub fn variety(&self) -> u32 {
        self.snacks.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.snacks.is_empty()
    }

    pub fn quantity(&self, name: &str) -> Option<u32> {
        self.snacks.get(name).copied()
    }

    pub fn snack(&self, name: &str) -> Option<Snack> {
        self.snacks.get(name).map(|quantity| Snack {
            name: name.to_string(),
            quantity: *quantity,
        })
    }

    /// All stocked snacks in name order.
    pub fn snacks(&self) -> Vec<Snack> {
        self.snacks
            .iter()
            .map(|(name, quantity)| Snack {
                name: name.clone(),
                quantity: *quantity,
            })
            .collect()
    }

    /// Stocked snack names in sorted order.
    pub fn snack_names(&self) -> Vec<String> {
        self.snacks.keys().cloned().collect()
    }

    /// The snack currently offered for dispensing, if any.
    pub fn pending_offer(&self) -> Option<&str> {
        self.pending_offer.as_deref()
    }
}

impl AggregateRoot for Inventory {
    type Id = InventoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddSnack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddSnack {
    pub inventory_id: InventoryId,
    pub name: String,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveSnack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveSnack {
    pub inventory_id: InventoryId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RefillToMax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefillToMax {
    pub inventory_id: InventoryId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RefillBy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefillBy {
    pub inventory_id: InventoryId,
    pub name: String,
    pub amount: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: OfferSnack. The session draws the name at random; the aggregate
/// only validates and records the offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferSnack {
    pub inventory_id: InventoryId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AcceptOffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptOffer {
    pub inventory_id: InventoryId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeclineOffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclineOffer {
    pub inventory_id: InventoryId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryCommand {
    AddSnack(AddSnack),
    RemoveSnack(RemoveSnack),
    RefillToMax(RefillToMax),
    RefillBy(RefillBy),
    OfferSnack(OfferSnack),
    AcceptOffer(AcceptOffer),
    DeclineOffer(DeclineOffer),
}

impl Command for InventoryCommand {
    fn target(&self) -> InventoryId {
        match self {
            InventoryCommand::AddSnack(c) => c.inventory_id,
            InventoryCommand::RemoveSnack(c) => c.inventory_id,
            InventoryCommand::RefillToMax(c) => c.inventory_id,
            InventoryCommand::RefillBy(c) => c.inventory_id,
            InventoryCommand::OfferSnack(c) => c.inventory_id,
            InventoryCommand::AcceptOffer(c) => c.inventory_id,
            InventoryCommand::DeclineOffer(c) => c.inventory_id,
        }
    }
}

/// Event: SnackAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnackAdded {
    pub inventory_id: InventoryId,
    pub name: String,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SnackRemoved. `now_empty` signals that the machine holds no snack
/// kinds at all after this removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnackRemoved {
    pub inventory_id: InventoryId,
    pub name: String,
    pub now_empty: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SnackRefilled. `clamped` marks a refill that hit the per-snack cap;
/// the refill itself still succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnackRefilled {
    pub inventory_id: InventoryId,
    pub name: String,
    pub quantity: u32,
    pub clamped: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SnackOffered. Establishes the pending offer; out-of-stock snacks
/// stay offerable, the flag just tells the view to disable accepting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnackOffered {
    pub inventory_id: InventoryId,
    pub name: String,
    pub out_of_stock: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SnackDispensed. Resolves the pending offer; the decrement is
/// clamped at zero, so accepting an out-of-stock offer dispenses nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnackDispensed {
    pub inventory_id: InventoryId,
    pub name: String,
    pub remaining: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OfferDeclined. Resolves the pending offer without touching stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferDeclined {
    pub inventory_id: InventoryId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    SnackAdded(SnackAdded),
    SnackRemoved(SnackRemoved),
    SnackRefilled(SnackRefilled),
    SnackOffered(SnackOffered),
    SnackDispensed(SnackDispensed),
    OfferDeclined(OfferDeclined),
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::SnackAdded(_) => "vending.snack.added",
            InventoryEvent::SnackRemoved(_) => "vending.snack.removed",
            InventoryEvent::SnackRefilled(_) => "vending.snack.refilled",
            InventoryEvent::SnackOffered(_) => "vending.snack.offered",
            InventoryEvent::SnackDispensed(_) => "vending.snack.dispensed",
            InventoryEvent::OfferDeclined(_) => "vending.offer.declined",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::SnackAdded(e) => e.occurred_at,
            InventoryEvent::SnackRemoved(e) => e.occurred_at,
            InventoryEvent::SnackRefilled(e) => e.occurred_at,
            InventoryEvent::SnackOffered(e) => e.occurred_at,
            InventoryEvent::SnackDispensed(e) => e.occurred_at,
            InventoryEvent::OfferDeclined(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Inventory {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::SnackAdded(e) => {
                self.snacks.insert(e.name.clone(), e.quantity);
            }
            InventoryEvent::SnackRemoved(e) => {
                self.snacks.remove(&e.name);
            }
            InventoryEvent::SnackRefilled(e) => {
                self.snacks.insert(e.name.clone(), e.quantity);
            }
            InventoryEvent::SnackOffered(e) => {
                self.pending_offer = Some(e.name.clone());
            }
            InventoryEvent::SnackDispensed(e) => {
                self.snacks.insert(e.name.clone(), e.remaining);
                self.pending_offer = None;
            }
            InventoryEvent::OfferDeclined(_) => {
                self.pending_offer = None;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::AddSnack(cmd) => self.handle_add(cmd),
            InventoryCommand::RemoveSnack(cmd) => self.handle_remove(cmd),
            InventoryCommand::RefillToMax(cmd) => self.handle_refill_to_max(cmd),
            InventoryCommand::RefillBy(cmd) => self.handle_refill_by(cmd),
            InventoryCommand::OfferSnack(cmd) => self.handle_offer(cmd),
            InventoryCommand::AcceptOffer(cmd) => self.handle_accept(cmd),
            InventoryCommand::DeclineOffer(cmd) => self.handle_decline(cmd),
        }
    }
}

impl Inventory {
    /// Offers serialize mutations: nothing else may change stock while one is
    /// unresolved, otherwise the offered snack could vanish mid-decision.
    fn ensure_no_pending_offer(&self) -> Result<(), DomainError> {
        match &self.pending_offer {
            Some(name) => Err(DomainError::offer_pending(name.clone())),
            None => Ok(()),
        }
    }

    fn handle_add(&self, cmd: &AddSnack) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_no_pending_offer()?;

        // Capacity is checked before the name/quantity, matching the machine
        // front panel where a full machine refuses before input is taken.
        if self.variety() >= self.limits.max_variety() {
            return Err(DomainError::capacity_exceeded(self.limits.max_variety()));
        }

        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidName);
        }
        if cmd.quantity > self.limits.max_quantity() {
            return Err(DomainError::invalid_quantity(self.limits.max_quantity()));
        }
        if self.snacks.contains_key(name) {
            return Err(DomainError::duplicate(name));
        }

        Ok(vec![InventoryEvent::SnackAdded(SnackAdded {
            inventory_id: cmd.inventory_id,
            name: name.to_string(),
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveSnack) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_no_pending_offer()?;

        if !self.snacks.contains_key(&cmd.name) {
            return Err(DomainError::not_found(cmd.name.clone()));
        }

        Ok(vec![InventoryEvent::SnackRemoved(SnackRemoved {
            inventory_id: cmd.inventory_id,
            name: cmd.name.clone(),
            now_empty: self.snacks.len() == 1,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_refill_to_max(&self, cmd: &RefillToMax) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_no_pending_offer()?;

        if !self.snacks.contains_key(&cmd.name) {
            return Err(DomainError::not_found(cmd.name.clone()));
        }

        Ok(vec![InventoryEvent::SnackRefilled(SnackRefilled {
            inventory_id: cmd.inventory_id,
            name: cmd.name.clone(),
            quantity: self.limits.max_quantity(),
            clamped: false,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_refill_by(&self, cmd: &RefillBy) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_no_pending_offer()?;

        let Some(current) = self.quantity(&cmd.name) else {
            return Err(DomainError::not_found(cmd.name.clone()));
        };

        let max = self.limits.max_quantity();
        let requested = current.saturating_add(cmd.amount);

        Ok(vec![InventoryEvent::SnackRefilled(SnackRefilled {
            inventory_id: cmd.inventory_id,
            name: cmd.name.clone(),
            quantity: requested.min(max),
            clamped: requested > max,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_offer(&self, cmd: &OfferSnack) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_no_pending_offer()?;

        if self.snacks.is_empty() {
            return Err(DomainError::EmptyInventory);
        }
        let Some(quantity) = self.quantity(&cmd.name) else {
            return Err(DomainError::not_found(cmd.name.clone()));
        };

        Ok(vec![InventoryEvent::SnackOffered(SnackOffered {
            inventory_id: cmd.inventory_id,
            name: cmd.name.clone(),
            out_of_stock: quantity == 0,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_accept(&self, cmd: &AcceptOffer) -> Result<Vec<InventoryEvent>, DomainError> {
        match &self.pending_offer {
            None => return Err(DomainError::NoOffer),
            Some(name) if *name != cmd.name => {
                return Err(DomainError::offer_mismatch(cmd.name.clone()));
            }
            Some(_) => {}
        }

        let Some(quantity) = self.quantity(&cmd.name) else {
            return Err(DomainError::invariant("pending offer names a missing snack"));
        };

        Ok(vec![InventoryEvent::SnackDispensed(SnackDispensed {
            inventory_id: cmd.inventory_id,
            name: cmd.name.clone(),
            remaining: quantity.saturating_sub(1),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_decline(&self, cmd: &DeclineOffer) -> Result<Vec<InventoryEvent>, DomainError> {
        // Declining never fails: whatever was on offer is simply withdrawn.
        Ok(vec![InventoryEvent::OfferDeclined(OfferDeclined {
            inventory_id: cmd.inventory_id,
            name: cmd.name.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

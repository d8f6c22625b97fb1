//! User-facing notices.
//!
//! The front panel shows one message bar with four display levels. This
//! module is the only place that knows how outcomes and errors read on
//! screen; the domain crates never format messages for display.

use serde::{Deserialize, Serialize};

use vendo_core::DomainError;
use vendo_inventory::InventoryEvent;

/// Display level of a notice, matching the panel's four styles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Danger,
}

/// A message ready for the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// The notice for a successful outcome, or `None` where the panel just
    /// clears its message bar (plain refills, declined offers).
    pub fn for_event(event: &InventoryEvent) -> Option<Notice> {
        match event {
            InventoryEvent::SnackAdded(e) => Some(Self::new(
                Severity::Success,
                format!("{} has been added!", e.name),
            )),
            InventoryEvent::SnackRemoved(e) => {
                if e.now_empty {
                    Some(Self::new(
                        Severity::Warning,
                        "There are no more snacks! Try adding a new snack.",
                    ))
                } else {
                    Some(Self::new(
                        Severity::Success,
                        format!("You have removed {} from this snack machine!", e.name),
                    ))
                }
            }
            InventoryEvent::SnackRefilled(e) => e.clamped.then(|| {
                Self::new(
                    Severity::Warning,
                    format!(
                        "You can have a maximum of {} units of the same good",
                        e.quantity
                    ),
                )
            }),
            InventoryEvent::SnackOffered(e) => {
                let mut message = format!("Woohoo! Your lucky snack is {}!", e.name);
                if e.out_of_stock {
                    message.push_str(" But it's out of stock :(");
                }
                Some(Self::new(Severity::Info, message))
            }
            InventoryEvent::SnackDispensed(e) => Some(Self::new(
                Severity::Success,
                format!("Enjoy your {}!", e.name),
            )),
            InventoryEvent::OfferDeclined(_) => None,
        }
    }

    /// The notice for a failed operation. Malformed input warns; identity
    /// conflicts, capacity, and an empty machine read as danger.
    pub fn for_error(error: &DomainError) -> Notice {
        match error {
            DomainError::InvalidName => {
                Self::new(Severity::Warning, "Give your new snack a name!")
            }
            DomainError::InvalidQuantity { max } => Self::new(
                Severity::Warning,
                format!("The quantity must be a whole number between 0 and {max}!"),
            ),
            DomainError::DuplicateName(_) => Self::new(
                Severity::Danger,
                "You already have this snack! Try adding a different snack.",
            ),
            DomainError::NotFound(name) => Self::new(
                Severity::Danger,
                format!("{name} is not stocked in this machine."),
            ),
            DomainError::CapacityExceeded { max_variety } => Self::new(
                Severity::Danger,
                format!(
                    "Max variety reached! This machine cannot hold more than {max_variety} kinds of snacks!"
                ),
            ),
            DomainError::EmptyInventory => {
                Self::new(Severity::Danger, "There are no snacks in the machine :(")
            }
            DomainError::OfferPending(name) => Self::new(
                Severity::Warning,
                format!("Decide on the offered {name} first!"),
            ),
            DomainError::NoOffer => {
                Self::new(Severity::Warning, "No snack has been offered yet.")
            }
            DomainError::OfferMismatch(name) => Self::new(
                Severity::Warning,
                format!("{name} is not the snack on offer."),
            ),
            other => Self::new(Severity::Danger, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vendo_core::InventoryId;
    use vendo_inventory::{OfferDeclined, SnackAdded, SnackOffered, SnackRefilled, SnackRemoved};

    fn test_id() -> InventoryId {
        InventoryId::new()
    }

    #[test]
    fn added_snack_reads_as_success() {
        let event = InventoryEvent::SnackAdded(SnackAdded {
            inventory_id: test_id(),
            name: "Chips".to_string(),
            quantity: 3,
            occurred_at: Utc::now(),
        });

        let notice = Notice::for_event(&event).unwrap();
        assert_eq!(notice.severity, Severity::Success);
        assert_eq!(notice.message, "Chips has been added!");
    }

    #[test]
    fn removing_the_last_snack_warns_about_the_empty_machine() {
        let event = InventoryEvent::SnackRemoved(SnackRemoved {
            inventory_id: test_id(),
            name: "Chips".to_string(),
            now_empty: true,
            occurred_at: Utc::now(),
        });

        let notice = Notice::for_event(&event).unwrap();
        assert_eq!(notice.severity, Severity::Warning);
        assert!(notice.message.contains("no more snacks"));
    }

    #[test]
    fn plain_refill_clears_the_message_bar() {
        let event = InventoryEvent::SnackRefilled(SnackRefilled {
            inventory_id: test_id(),
            name: "Chips".to_string(),
            quantity: 7,
            clamped: false,
            occurred_at: Utc::now(),
        });

        assert_eq!(Notice::for_event(&event), None);
    }

    #[test]
    fn clamped_refill_warns_with_the_cap() {
        let event = InventoryEvent::SnackRefilled(SnackRefilled {
            inventory_id: test_id(),
            name: "Chips".to_string(),
            quantity: 20,
            clamped: true,
            occurred_at: Utc::now(),
        });

        let notice = Notice::for_event(&event).unwrap();
        assert_eq!(notice.severity, Severity::Warning);
        assert_eq!(
            notice.message,
            "You can have a maximum of 20 units of the same good"
        );
    }

    #[test]
    fn out_of_stock_offer_appends_the_apology() {
        let event = InventoryEvent::SnackOffered(SnackOffered {
            inventory_id: test_id(),
            name: "Gum".to_string(),
            out_of_stock: true,
            occurred_at: Utc::now(),
        });

        let notice = Notice::for_event(&event).unwrap();
        assert_eq!(notice.severity, Severity::Info);
        assert_eq!(
            notice.message,
            "Woohoo! Your lucky snack is Gum! But it's out of stock :("
        );
    }

    #[test]
    fn declined_offer_clears_the_message_bar() {
        let event = InventoryEvent::OfferDeclined(OfferDeclined {
            inventory_id: test_id(),
            name: "Gum".to_string(),
            occurred_at: Utc::now(),
        });

        assert_eq!(Notice::for_event(&event), None);
    }

    #[test]
    fn error_severities_follow_the_panel_styles() {
        let warnings = [
            DomainError::InvalidName,
            DomainError::invalid_quantity(20),
            DomainError::offer_pending("Chips"),
            DomainError::NoOffer,
            DomainError::offer_mismatch("Candy"),
        ];
        for err in &warnings {
            assert_eq!(Notice::for_error(err).severity, Severity::Warning);
        }

        let dangers = [
            DomainError::duplicate("Chips"),
            DomainError::not_found("Chips"),
            DomainError::capacity_exceeded(10),
            DomainError::EmptyInventory,
        ];
        for err in &dangers {
            assert_eq!(Notice::for_error(err).severity, Severity::Danger);
        }
    }

    #[test]
    fn capacity_message_names_the_limit() {
        let notice = Notice::for_error(&DomainError::capacity_exceeded(10));
        assert_eq!(
            notice.message,
            "Max variety reached! This machine cannot hold more than 10 kinds of snacks!"
        );
    }
}

//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant here is an expected, recoverable, user-facing condition; the
/// presentation layer turns it into a message. Nothing in this enum is fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Snack name was blank after trimming.
    #[error("snack name cannot be blank")]
    InvalidName,

    /// Quantity or refill amount exceeds the per-snack cap.
    #[error("quantity must be between 0 and {max}")]
    InvalidQuantity { max: u32 },

    /// A snack with this name is already stocked.
    #[error("snack already stocked: {0}")]
    DuplicateName(String),

    /// No snack with this name is stocked.
    #[error("snack not stocked: {0}")]
    NotFound(String),

    /// The machine already holds the maximum number of snack kinds.
    #[error("machine cannot hold more than {max_variety} kinds of snacks")]
    CapacityExceeded { max_variety: u32 },

    /// A snack was requested from a machine with nothing stocked.
    #[error("no snacks in the machine")]
    EmptyInventory,

    /// A mutating operation arrived while an offered snack awaits a decision.
    #[error("the offer for {0} must be accepted or declined first")]
    OfferPending(String),

    /// An accept arrived while no offer was outstanding.
    #[error("no snack has been offered")]
    NoOffer,

    /// An accept arrived for a snack other than the one on offer.
    #[error("no pending offer for {0}")]
    OfferMismatch(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A domain invariant was violated (programming defect, caught by tests).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn invalid_quantity(max: u32) -> Self {
        Self::InvalidQuantity { max }
    }

    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateName(name.into())
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    pub fn capacity_exceeded(max_variety: u32) -> Self {
        Self::CapacityExceeded { max_variety }
    }

    pub fn offer_pending(name: impl Into<String>) -> Self {
        Self::OfferPending(name.into())
    }

    pub fn offer_mismatch(name: impl Into<String>) -> Self {
        Self::OfferMismatch(name.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}

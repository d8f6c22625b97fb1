//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value** - two value
/// objects with the same attribute values are the same value. To "modify"
/// one, construct a new one. `Limits` is the canonical example here: a
/// machine's capacity bounds have no identity of their own.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

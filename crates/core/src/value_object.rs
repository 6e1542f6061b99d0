//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Forecast parameters, per-period estimates, demand patterns and accuracy
/// reports are values: created once per request, never mutated, and compared
/// by their attributes. To "change" one, build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

//! Value object trait: equality by value, not identity.
//!
//! Combo components and resolved sale lines are value objects: two
//! `(msku, quantity)` pairs with the same contents are interchangeable.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. To
/// "modify" one, build a new value.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct ResolvedLine {
///     msku: Msku,
///     quantity: i64,
/// }
///
/// impl ValueObject for ResolvedLine {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

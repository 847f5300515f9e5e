//! Things with a stable identity.

/// A record identified by a key rather than by its contents.
///
/// A catalog product stays the same product while its stock moves; catalogs
/// index entities by `id()` in key order.
pub trait Entity {
    type Id: Clone + Ord + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> &Self::Id;
}

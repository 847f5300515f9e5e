//! Stock persistence boundary.
//!
//! The core never talks to a database directly: it calls a [`ProductStore`]
//! and applies outgoing quantities one MSKU at a time. Atomicity, if needed,
//! belongs to the store implementation.

pub mod apply;
pub mod memory;
pub mod store;

pub use apply::{ApplyFailure, ApplyOutcome, apply_deltas};
pub use memory::InMemoryProductStore;
pub use store::{ProductStore, StockMovement, StoreError};

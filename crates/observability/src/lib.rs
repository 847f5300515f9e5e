//! Shared tracing setup for binaries.

/// Tracing subscriber configuration.
pub mod tracing;

pub use self::tracing::{LogFormat, init, init_with};

//! SKU resolution and combo expansion.
//!
//! Turns a marketplace SKU plus order quantity into the MSKU quantities it
//! consumes, using an immutable [`wms_catalog::Catalog`].

pub mod error;
pub mod normalize;
pub mod resolver;

pub use error::ResolveError;
pub use normalize::normalize_sku;
pub use resolver::{ProductKind, Resolution, ResolvedLine, SkuResolver};
